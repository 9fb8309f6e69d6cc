//! The streaming completion orchestrator.
//!
//! One [`CompletionService::execute`] call drives a full turn: resolve the
//! chat (creating it on first contact), append the user message under the
//! eviction policy, stream the provider's reply while publishing growing
//! snapshots, append the assistant message, and commit the chat.

use crate::error::EngineError;
use crate::Result;
use chatstream_core::{Chat, ChatConfig, HeuristicTokenizer, Message, Role, Tokenizer};
use chatstream_provider::{
    CompletionParams, CompletionProvider, CompletionRequest, PromptMessage, ProviderError,
    StreamEvent,
};
use chatstream_store::{ChatGateway, StoreError};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Everything one invocation needs: identity, the user's turn, and the
/// parameters used if the chat has to be created first.
#[derive(Debug, Clone)]
pub struct CompletionInput {
    /// Chat to continue. Unknown IDs start a fresh chat.
    pub chat_id: String,

    /// Owner of the chat.
    pub user_id: String,

    /// The user's message for this turn.
    pub user_message: String,

    /// Generation config applied when the chat is created. Ignored for an
    /// existing chat, which keeps the config it was created with.
    pub config: ChatConfig,

    /// System message seeding a newly created chat.
    pub initial_system_message: String,
}

/// Final result of one invocation.
#[derive(Debug, Clone)]
pub struct CompletionOutput {
    /// Chat the turn was appended to (freshly generated for a new chat).
    pub chat_id: String,

    /// Owner of the chat.
    pub user_id: String,

    /// The complete assistant reply.
    pub content: String,
}

/// Content-so-far published after each delta.
#[derive(Debug, Clone)]
pub struct StreamSnapshot {
    /// Chat the reply belongs to.
    pub chat_id: String,

    /// Owner of the chat.
    pub user_id: String,

    /// Accumulated reply, strictly growing across snapshots.
    pub content: String,
}

/// Orchestrates one completion turn against a gateway and a provider.
///
/// The service holds no per-chat state; callers serialize invocations per
/// chat ID, invocations on distinct chats are independent.
pub struct CompletionService {
    gateway: Arc<dyn ChatGateway>,
    provider: Arc<dyn CompletionProvider>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl CompletionService {
    /// Create a service using the heuristic tokenizer.
    pub fn new(gateway: Arc<dyn ChatGateway>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            gateway,
            provider,
            tokenizer: Arc::new(HeuristicTokenizer),
        }
    }

    /// Replace the tokenizer used for message costing.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Run one completion turn.
    ///
    /// Snapshots of the growing reply go to `snapshots`; a dropped receiver
    /// stops publishing but the turn still runs to completion. Cancellation
    /// is honored at every suspension point and aborts without committing.
    /// The chat is committed only after the full reply has been appended.
    pub async fn execute(
        &self,
        input: CompletionInput,
        snapshots: mpsc::Sender<StreamSnapshot>,
        cancel: CancellationToken,
    ) -> Result<CompletionOutput> {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let mut chat = self.resolve_chat(&input, &cancel).await?;

        let user_message = Message::new(
            Role::User,
            input.user_message.as_str(),
            &chat.config().model,
            self.tokenizer.as_ref(),
        )?;
        chat.add_message(user_message)?;

        let request = CompletionRequest {
            model: chat.config().model.name().to_string(),
            messages: chat.active_messages().iter().map(PromptMessage::from).collect(),
            params: CompletionParams::from(chat.config()),
        };
        debug!(
            chat_id = %chat.id(),
            provider = self.provider.name(),
            messages = request.messages.len(),
            "invoking completion provider"
        );

        let mut stream = tokio::select! {
            result = self.provider.stream_completion(request) => result?,
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
        };

        let mut content = String::new();
        let mut publishing = true;

        loop {
            let event = tokio::select! {
                event = stream.next() => event,
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            };
            let Some(event) = event else {
                break;
            };

            match event? {
                StreamEvent::ContentDelta { delta } => {
                    content.push_str(&delta);
                    if publishing {
                        let snapshot = StreamSnapshot {
                            chat_id: chat.id().to_string(),
                            user_id: chat.user_id().to_string(),
                            content: content.clone(),
                        };
                        tokio::select! {
                            sent = snapshots.send(snapshot) => {
                                if sent.is_err() {
                                    debug!(chat_id = %chat.id(), "snapshot receiver gone, draining without publishing");
                                    publishing = false;
                                }
                            }
                            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                        }
                    }
                }
                StreamEvent::End { stop_reason } => {
                    debug!(chat_id = %chat.id(), ?stop_reason, "completion stream ended");
                    break;
                }
            }
        }

        if content.is_empty() {
            return Err(EngineError::Provider(ProviderError::stream(
                "provider produced no content",
            )));
        }

        let assistant_message = Message::new(
            Role::Assistant,
            content.as_str(),
            &chat.config().model,
            self.tokenizer.as_ref(),
        )?;
        chat.add_message(assistant_message)?;

        tokio::select! {
            saved = self.gateway.save(&chat) => saved.map_err(EngineError::Persistence)?,
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
        }

        info!(
            chat_id = %chat.id(),
            token_usage = chat.token_usage(),
            reply_len = content.len(),
            "completion committed"
        );

        Ok(CompletionOutput {
            chat_id: chat.id().to_string(),
            user_id: chat.user_id().to_string(),
            content,
        })
    }

    /// Look up the chat, creating and persisting a new one on a miss.
    ///
    /// A new chat gets a freshly generated ID, not the one from the input.
    async fn resolve_chat(
        &self,
        input: &CompletionInput,
        cancel: &CancellationToken,
    ) -> Result<Chat> {
        let found = tokio::select! {
            found = self.gateway.find_by_chat_id(&input.chat_id) => found,
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
        };

        match found {
            Ok(chat) => Ok(chat),
            Err(StoreError::NotFound(_)) => {
                let system_message = Message::new(
                    Role::System,
                    input.initial_system_message.as_str(),
                    &input.config.model,
                    self.tokenizer.as_ref(),
                )?;
                let chat = Chat::new(input.user_id.as_str(), system_message, input.config.clone())?;

                tokio::select! {
                    created = self.gateway.create(&chat) => {
                        created.map_err(EngineError::ChatResolution)?
                    }
                    _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                }

                info!(chat_id = %chat.id(), user_id = %chat.user_id(), "created new chat");
                Ok(chat)
            }
            Err(e) => Err(EngineError::ChatResolution(e)),
        }
    }
}
