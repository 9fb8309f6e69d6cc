//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Main chatstream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model settings.
    #[serde(default)]
    pub model: ModelSettings,

    /// Generation parameter defaults.
    #[serde(default)]
    pub completion: CompletionSettings,

    /// System message each new chat is seeded with.
    #[serde(default = "default_initial_system_message")]
    pub initial_system_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            completion: CompletionSettings::default(),
            initial_system_message: default_initial_system_message(),
        }
    }
}

/// Model settings section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model name sent to the provider and tokenizer.
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Context window size, in tokens.
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

/// Generation parameters section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Sampling temperature, in [0, 2].
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling parameter, in [0, 2].
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Number of completion choices.
    #[serde(default = "default_n")]
    pub n: u32,

    /// Stop sequences.
    #[serde(default)]
    pub stop: Vec<String>,

    /// Maximum tokens generated per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Presence penalty, in [-2, 2].
    #[serde(default)]
    pub presence_penalty: f32,

    /// Frequency penalty, in [-2, 2].
    #[serde(default)]
    pub frequency_penalty: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            n: default_n(),
            stop: Vec::new(),
            max_tokens: default_max_tokens(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_context_tokens() -> usize {
    128_000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    1.0
}

fn default_n() -> u32 {
    1
}

fn default_max_tokens() -> usize {
    1024
}

fn default_initial_system_message() -> String {
    "You are a helpful assistant.".to_string()
}
