//! A single turn of dialogue with its token cost.

use super::Model;
use crate::error::ChatError;
use crate::id;
use crate::tokenizer::Tokenizer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

impl Role {
    /// Wire name of the role, as sent to providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation.
///
/// Created once and immutable thereafter. The token cost is computed at
/// construction from the content under the model's tokenizer and never
/// recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    token_count: usize,
    model: Model,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message, counting its token cost under `model`.
    ///
    /// Fails with a validation error when the content is empty.
    pub fn new(
        role: Role,
        content: impl Into<String>,
        model: &Model,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Self, ChatError> {
        let content = content.into();
        if content.is_empty() {
            return Err(ChatError::validation("message content is empty"));
        }

        let token_count = tokenizer.count_tokens(model.name(), &content);

        Ok(Self {
            id: id::uuid(),
            role,
            content,
            token_count,
            model: model.clone(),
            created_at: Utc::now(),
        })
    }

    /// Unique message ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sender role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Token cost, fixed at creation.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Model the token cost was counted under.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
