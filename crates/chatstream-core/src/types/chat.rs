//! The chat aggregate: active window, evicted history, and the
//! token-budget eviction policy.

use super::{Message, Model};
use crate::error::ChatError;
use crate::id;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generation parameters, fixed per chat at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model the chat runs against.
    pub model: Model,

    /// Sampling temperature, in [0, 2].
    pub temperature: f32,

    /// Nucleus sampling parameter, in [0, 2].
    pub top_p: f32,

    /// Number of completion choices requested from the provider.
    pub n: u32,

    /// Stop sequences.
    #[serde(default)]
    pub stop: Vec<String>,

    /// Maximum tokens the provider may generate per completion.
    pub max_completion_tokens: usize,

    /// Presence penalty, in [-2, 2].
    pub presence_penalty: f32,

    /// Frequency penalty, in [-2, 2].
    pub frequency_penalty: f32,
}

/// Lifecycle state of a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    /// Accepting appends.
    Active,

    /// Terminal; all appends are rejected.
    Ended,
}

/// An ordered conversation governed by a token budget.
///
/// The active window holds the messages currently within the model's budget,
/// in conversation order; the evicted history holds messages pushed out of
/// the window, in the order they were removed. `token_usage` is derived from
/// the active window inside `add_message` and is never set by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    id: String,
    user_id: String,
    initial_system_message: Message,
    active_messages: Vec<Message>,
    evicted_messages: Vec<Message>,
    status: ChatStatus,
    token_usage: usize,
    config: ChatConfig,
}

impl Chat {
    /// Create a new chat seeded with its initial system message.
    ///
    /// The initial message goes through the same append-with-eviction path as
    /// any other; the constructed chat is then validated as a whole. Any
    /// violation returns the error instead of a chat.
    pub fn new(
        user_id: impl Into<String>,
        initial_system_message: Message,
        config: ChatConfig,
    ) -> Result<Self, ChatError> {
        let mut chat = Self {
            id: id::uuid(),
            user_id: user_id.into(),
            initial_system_message: initial_system_message.clone(),
            active_messages: Vec::new(),
            evicted_messages: Vec::new(),
            status: ChatStatus::Active,
            token_usage: 0,
            config,
        };

        chat.add_message(initial_system_message)?;
        chat.validate()?;

        Ok(chat)
    }

    /// Append a message, evicting from the front of the active window until
    /// it fits the model's token budget.
    ///
    /// Oldest-first eviction, no reordering, no partial truncation. Fails
    /// with `ChatEnded` on an ended chat (leaving the window untouched), or
    /// with `MessageTooLarge` when the message alone exceeds the budget;
    /// evictions already performed are not undone.
    pub fn add_message(&mut self, message: Message) -> Result<(), ChatError> {
        if self.status == ChatStatus::Ended {
            return Err(ChatError::ChatEnded);
        }

        let budget = self.config.model.max_tokens();
        while self.token_usage + message.token_count() > budget {
            if self.active_messages.is_empty() {
                return Err(ChatError::MessageTooLarge {
                    tokens: message.token_count(),
                    max: budget,
                });
            }
            let oldest = self.active_messages.remove(0);
            debug!(
                chat_id = %self.id,
                message_id = %oldest.id(),
                tokens = oldest.token_count(),
                "evicting oldest message to fit token budget"
            );
            self.evicted_messages.push(oldest);
            self.recompute_token_usage();
        }

        self.active_messages.push(message);
        self.recompute_token_usage();
        Ok(())
    }

    /// End the chat. Idempotent; an ended chat rejects all further appends.
    pub fn end(&mut self) {
        self.status = ChatStatus::Ended;
    }

    /// Chat ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The system message the chat was seeded with.
    pub fn initial_system_message(&self) -> &Message {
        &self.initial_system_message
    }

    /// Messages currently within the token budget, in conversation order.
    pub fn active_messages(&self) -> &[Message] {
        &self.active_messages
    }

    /// Messages evicted from the window, in order of removal.
    pub fn evicted_messages(&self) -> &[Message] {
        &self.evicted_messages
    }

    /// Lifecycle state.
    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Whether the chat still accepts appends.
    pub fn is_active(&self) -> bool {
        self.status == ChatStatus::Active
    }

    /// Sum of token costs over the active window.
    pub fn token_usage(&self) -> usize {
        self.token_usage
    }

    /// Generation parameters.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn recompute_token_usage(&mut self) {
        self.token_usage = self.active_messages.iter().map(Message::token_count).sum();
    }

    fn validate(&self) -> Result<(), ChatError> {
        if self.user_id.is_empty() {
            return Err(ChatError::validation("user_id is empty"));
        }
        validate_range("temperature", self.config.temperature, 0.0, 2.0)?;
        validate_range("top_p", self.config.top_p, 0.0, 2.0)?;
        validate_range("presence_penalty", self.config.presence_penalty, -2.0, 2.0)?;
        validate_range("frequency_penalty", self.config.frequency_penalty, -2.0, 2.0)?;
        Ok(())
    }
}

fn validate_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), ChatError> {
    // NaN compares false against both bounds, so reject it explicitly.
    if value.is_nan() || value < min || value > max {
        return Err(ChatError::validation(format!(
            "{name} must be within [{min}, {max}], got {value}"
        )));
    }
    Ok(())
}
