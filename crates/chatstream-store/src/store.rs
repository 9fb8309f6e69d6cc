//! Storage implementations.

use crate::{ChatGateway, Result, StoreError};
use async_trait::async_trait;
use chatstream_core::{id, Chat};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory chat store, for tests and embedded use.
pub struct MemoryChatStore {
    chats: RwLock<HashMap<String, Chat>>,
}

impl Default for MemoryChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChatStore {
    /// Create a new in-memory chat store.
    pub fn new() -> Self {
        Self {
            chats: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored chats.
    pub async fn count(&self) -> usize {
        self.chats.read().await.len()
    }

    /// IDs of all stored chats, in no particular order.
    pub async fn chat_ids(&self) -> Vec<String> {
        self.chats.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ChatGateway for MemoryChatStore {
    async fn find_by_chat_id(&self, chat_id: &str) -> Result<Chat> {
        let chats = self.chats.read().await;
        chats
            .get(chat_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(chat_id.to_string()))
    }

    async fn create(&self, chat: &Chat) -> Result<()> {
        let mut chats = self.chats.write().await;
        if chats.contains_key(chat.id()) {
            return Err(StoreError::AlreadyExists(chat.id().to_string()));
        }
        chats.insert(chat.id().to_string(), chat.clone());
        Ok(())
    }

    async fn save(&self, chat: &Chat) -> Result<()> {
        let mut chats = self.chats.write().await;
        if !chats.contains_key(chat.id()) {
            return Err(StoreError::NotFound(chat.id().to_string()));
        }
        chats.insert(chat.id().to_string(), chat.clone());
        Ok(())
    }
}

/// File-backed chat store: one JSON document per chat under a base
/// directory.
///
/// Saves write to a temporary file and then rename into place, so a crash
/// never leaves a half-written chat behind. The whole aggregate (status,
/// token usage, active and evicted messages) replaces atomically.
pub struct FileChatStore {
    base_dir: PathBuf,
}

impl FileChatStore {
    /// Create a new file-backed chat store rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn chat_path(&self, chat_id: &str) -> PathBuf {
        // Chat IDs are UUIDs; guard against anything path-like anyway.
        let safe: String = chat_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }

    async fn write_atomic(&self, chat: &Chat) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;

        let path = self.chat_path(chat.id());
        // Unique suffix so concurrent writers never share a temp file.
        let tmp_path = path.with_extension(format!("{}.tmp", id::short_id()));
        let json = serde_json::to_string_pretty(chat)?;

        fs::write(&tmp_path, json).await?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            // Best effort; the store must not accumulate orphaned temp files.
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(chat_id = %chat.id(), path = %path.display(), "persisted chat");
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for FileChatStore {
    async fn find_by_chat_id(&self, chat_id: &str) -> Result<Chat> {
        let path = self.chat_path(chat_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(chat_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    async fn create(&self, chat: &Chat) -> Result<()> {
        let path = self.chat_path(chat.id());
        if fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists(chat.id().to_string()));
        }
        self.write_atomic(chat).await
    }

    async fn save(&self, chat: &Chat) -> Result<()> {
        let path = self.chat_path(chat.id());
        if !fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(chat.id().to_string()));
        }
        self.write_atomic(chat).await
    }
}
