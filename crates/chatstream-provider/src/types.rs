//! Common types for completion providers.

use chatstream_core::{ChatConfig, Message};
use serde::{Deserialize, Serialize};

/// One entry of the prompt window sent to a provider: role and content only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Wire role ("user", "system", "assistant").
    pub role: String,

    /// Message text.
    pub content: String,
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
        }
    }
}

/// Generation parameters for one completion call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling parameter.
    pub top_p: f32,

    /// Number of completion choices.
    pub n: u32,

    /// Stop sequences.
    #[serde(default)]
    pub stop: Vec<String>,

    /// Maximum tokens to generate.
    pub max_tokens: usize,

    /// Presence penalty.
    pub presence_penalty: f32,

    /// Frequency penalty.
    pub frequency_penalty: f32,
}

impl From<&ChatConfig> for CompletionParams {
    fn from(config: &ChatConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            n: config.n,
            stop: config.stop.clone(),
            max_tokens: config.max_completion_tokens,
            presence_penalty: config.presence_penalty,
            frequency_penalty: config.frequency_penalty,
        }
    }
}

/// A full streaming completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model name.
    pub model: String,

    /// Post-eviction active window, in conversation order.
    pub messages: Vec<PromptMessage>,

    /// Generation parameters.
    pub params: CompletionParams,
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Hit a stop sequence.
    StopSequence,
    /// Hit max tokens limit.
    MaxTokens,
    /// Content was filtered.
    ContentFilter,
    /// Unknown reason.
    Unknown,
}

/// Streaming event.
///
/// End-of-stream is the distinguished `End` event, never a delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Text delta.
    ContentDelta { delta: String },

    /// Stream completed.
    End { stop_reason: StopReason },
}
