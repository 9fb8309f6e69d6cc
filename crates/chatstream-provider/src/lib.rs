//! Completion provider interface for chatstream.
//!
//! The orchestrator consumes providers through the [`CompletionProvider`]
//! trait: given an ordered message list and generation parameters, a provider
//! returns a lazy stream of content deltas terminated by an explicit end
//! event.
//!
//! # Example
//!
//! ```rust,ignore
//! use chatstream_provider::{CompletionProvider, CompletionRequest, OpenAiProvider};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::from_env()?;
//!     let mut stream = provider.stream_completion(request).await?;
//!     while let Some(event) = stream.next().await {
//!         println!("{:?}", event?);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod types;

pub mod openai;

pub use error::{ProviderError, Result};
pub use openai::OpenAiProvider;
pub use types::*;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of completion events for a streamed response.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// A remote service that generates completions as a delta stream.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get provider name.
    fn name(&self) -> &str;

    /// Start a streaming completion for the given message window and
    /// generation parameters.
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream>;
}
