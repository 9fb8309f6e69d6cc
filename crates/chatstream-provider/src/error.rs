//! Error types for completion providers.

use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider error types.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication error (invalid API key, etc.).
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded: {message}, retry after {retry_after:?} seconds")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Invalid request (bad parameters, etc.).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Server error from the provider.
    #[error("server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Network error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Fault while draining the response stream.
    #[error("stream error: {0}")]
    Stream(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a server error.
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a stream error.
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error is transient and worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Network(_) => true,
            Self::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
