//! Streaming completion orchestrator for chatstream.
//!
//! One [`CompletionService::execute`] call drives a full completion round:
//! resolve or create the chat, append the caller's turn under the token
//! budget, stream the provider's reply while publishing content-so-far
//! snapshots to a per-invocation channel, append the assistant turn, and
//! commit the chat through the gateway.

mod error;
mod service;

pub use error::EngineError;
pub use service::{CompletionInput, CompletionOutput, CompletionService, StreamSnapshot};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
