//! Error taxonomy for the completion orchestrator.
//!
//! Each variant names the step that failed so a caller can tell a retryable
//! transient (provider, persistence) from a caller/data error (validation,
//! ended chat) at a glance.

use chatstream_core::ChatError;
use chatstream_provider::ProviderError;
use chatstream_store::StoreError;
use thiserror::Error;

/// Errors terminating one orchestrator invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Chat lookup or creation failed (a lookup miss is handled by
    /// creating, so this is always fatal).
    #[error("failed to resolve chat: {0}")]
    ChatResolution(#[source] StoreError),

    /// Message construction or the eviction policy rejected the turn.
    #[error("chat state error: {0}")]
    Chat(#[from] ChatError),

    /// The provider call or the stream drain failed.
    #[error("completion provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Committing the chat after a completed stream failed.
    #[error("failed to persist chat: {0}")]
    Persistence(#[source] StoreError),

    /// The caller cancelled the invocation.
    #[error("invocation cancelled")]
    Cancelled,
}

impl EngineError {
    /// Whether the caller may retry the whole invocation.
    ///
    /// Validation and ended-chat errors are never retryable; provider and
    /// store faults defer to the underlying classification.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ChatResolution(e) | Self::Persistence(e) => e.is_retryable(),
            Self::Provider(e) => e.is_retryable(),
            Self::Chat(_) | Self::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let err = EngineError::Provider(ProviderError::server_error(503, "overloaded"));
        assert!(err.is_retryable());

        let err = EngineError::Provider(ProviderError::invalid_request("bad params"));
        assert!(!err.is_retryable());

        let err = EngineError::Persistence(StoreError::Io(std::io::Error::other("disk")));
        assert!(err.is_retryable());

        let err = EngineError::Chat(ChatError::ChatEnded);
        assert!(!err.is_retryable());

        assert!(!EngineError::Cancelled.is_retryable());
    }

    #[test]
    fn test_display_names_the_step() {
        let err = EngineError::ChatResolution(StoreError::Io(std::io::Error::other("net")));
        assert!(err.to_string().starts_with("failed to resolve chat"));

        let err = EngineError::Persistence(StoreError::Io(std::io::Error::other("net")));
        assert!(err.to_string().starts_with("failed to persist chat"));
    }
}
