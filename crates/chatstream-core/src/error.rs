//! Error types for chatstream core.

use std::path::PathBuf;
use thiserror::Error;

/// Core result type alias.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors raised by the conversation state machine.
///
/// None of these are retryable: they indicate caller or data errors and are
/// surfaced immediately.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A message, chat, or config failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An append was attempted on a chat that has ended.
    #[error("chat has ended and accepts no further messages")]
    ChatEnded,

    /// A single message exceeds the model's whole context budget; the
    /// eviction loop emptied the active window and the message still
    /// does not fit.
    #[error("message of {tokens} tokens exceeds the model budget of {max}")]
    MessageTooLarge { tokens: usize, max: usize },

    /// A model reference was malformed.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

impl ChatError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid-model error.
    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel(message.into())
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON5 parse error: {0}")]
    Json5(String),
}
