//! Chat gateway interface and storage backends for chatstream.
//!
//! Durable custody of chats between orchestrator invocations lives behind
//! the [`ChatGateway`] trait so storage technology stays swappable. The
//! backends here persist a chat as one document, so a save replaces status,
//! token usage, and both message lists through a single transactional
//! boundary.

mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::{FileChatStore, MemoryChatStore};

use async_trait::async_trait;
use chatstream_core::Chat;

/// Durable lookup/create/save of chats by identity.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Find a chat by its ID. Fails with [`StoreError::NotFound`] on a miss.
    async fn find_by_chat_id(&self, chat_id: &str) -> Result<Chat>;

    /// Persist a newly created chat. Fails with [`StoreError::AlreadyExists`]
    /// if the ID is taken.
    async fn create(&self, chat: &Chat) -> Result<()>;

    /// Atomically replace the stored state of an existing chat; status,
    /// token usage, active and evicted messages move together. Fails with
    /// [`StoreError::NotFound`] if the chat was never created.
    async fn save(&self, chat: &Chat) -> Result<()>;
}
