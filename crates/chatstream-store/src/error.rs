//! Error types for chat storage.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage error types.
///
/// `NotFound` is the one recoverable case: the orchestrator answers it by
/// creating a new chat. Everything else is fatal for the invocation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No chat stored under this ID.
    #[error("chat not found: {0}")]
    NotFound(String),

    /// A chat with this ID already exists.
    #[error("chat already exists: {0}")]
    AlreadyExists(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this error is transient and worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound("abc".to_string());
        assert_eq!(err.to_string(), "chat not found: abc");
    }

    #[test]
    fn test_retryable() {
        assert!(StoreError::Io(std::io::Error::other("disk")).is_retryable());
        assert!(!StoreError::NotFound("x".to_string()).is_retryable());
        assert!(!StoreError::AlreadyExists("x".to_string()).is_retryable());
    }
}
