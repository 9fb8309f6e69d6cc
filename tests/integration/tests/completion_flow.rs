//! End-to-end completion flow integration tests.
//!
//! These drive the orchestrator against a real file-backed store and a
//! scripted provider, checking persistence across store instances, snapshot
//! relaying, and the eviction policy over multiple turns.

use async_trait::async_trait;
use chatstream_core::{ChatConfig, Model, Role};
use chatstream_engine::{CompletionInput, CompletionService, StreamSnapshot};
use chatstream_provider::{
    CompletionProvider, CompletionRequest, CompletionStream, StopReason, StreamEvent,
};
use chatstream_store::{ChatGateway, FileChatStore};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Provider replaying a fixed reply, split into three deltas.
struct ScriptedProvider {
    reply: String,
}

impl ScriptedProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_completion(
        &self,
        _request: CompletionRequest,
    ) -> chatstream_provider::Result<CompletionStream> {
        let third = (self.reply.len() / 3).max(1);
        let mut events: Vec<chatstream_provider::Result<StreamEvent>> = self
            .reply
            .as_bytes()
            .chunks(third)
            .map(|chunk| {
                Ok(StreamEvent::ContentDelta {
                    delta: String::from_utf8(chunk.to_vec()).unwrap(),
                })
            })
            .collect();
        events.push(Ok(StreamEvent::End {
            stop_reason: StopReason::EndTurn,
        }));
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

fn config(max_tokens: usize) -> ChatConfig {
    ChatConfig {
        model: Model::new("test-model", max_tokens).unwrap(),
        temperature: 0.7,
        top_p: 1.0,
        n: 1,
        stop: Vec::new(),
        max_completion_tokens: 256,
        presence_penalty: 0.0,
        frequency_penalty: 0.0,
    }
}

fn input(chat_id: &str, user_message: &str, max_tokens: usize) -> CompletionInput {
    CompletionInput {
        chat_id: chat_id.to_string(),
        user_id: "user-1".to_string(),
        user_message: user_message.to_string(),
        config: config(max_tokens),
        initial_system_message: "You are a helpful assistant.".to_string(),
    }
}

#[tokio::test]
async fn test_turn_persists_across_store_instances() {
    let dir = TempDir::new().unwrap();

    let chat_id = {
        let gateway = Arc::new(FileChatStore::new(dir.path()));
        let provider = Arc::new(ScriptedProvider::new("Hello from the model"));
        let service = CompletionService::new(gateway, provider);

        let (tx, _rx) = mpsc::channel(16);
        let output = service
            .execute(input("missing", "Say hello", 100_000), tx, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output.content, "Hello from the model");
        output.chat_id
    };

    // A fresh store over the same directory sees the committed chat.
    let reopened = FileChatStore::new(dir.path());
    let chat = reopened.find_by_chat_id(&chat_id).await.unwrap();
    let roles: Vec<Role> = chat.active_messages().iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    assert_eq!(chat.active_messages()[2].content(), "Hello from the model");

    let sum: usize = chat.active_messages().iter().map(|m| m.token_count()).sum();
    assert_eq!(chat.token_usage(), sum);
}

#[tokio::test]
async fn test_multi_turn_continuity() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(FileChatStore::new(dir.path()));
    let provider = Arc::new(ScriptedProvider::new("A fine question"));
    let service = CompletionService::new(gateway.clone(), provider);

    let (tx, _rx) = mpsc::channel(16);
    let first = service
        .execute(input("missing", "First question", 100_000), tx, CancellationToken::new())
        .await
        .unwrap();

    let (tx, _rx) = mpsc::channel(16);
    let second = service
        .execute(
            input(&first.chat_id, "Second question", 100_000),
            tx,
            CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(second.chat_id, first.chat_id);

    let chat = gateway.find_by_chat_id(&first.chat_id).await.unwrap();
    // system + two user/assistant pairs
    assert_eq!(chat.active_messages().len(), 5);
    assert!(chat.evicted_messages().is_empty());
    assert_eq!(chat.active_messages()[1].content(), "First question");
    assert_eq!(chat.active_messages()[3].content(), "Second question");
}

#[tokio::test]
async fn test_eviction_across_turns_keeps_budget() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(FileChatStore::new(dir.path()));
    // 40-char reply is 10 tokens under the heuristic counter.
    let provider = Arc::new(ScriptedProvider::new("0123456789012345678901234567890123456789"));
    let service = CompletionService::new(gateway.clone(), provider);

    let budget = 25;
    let user_message = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"; // 10 tokens

    let (tx, _rx) = mpsc::channel(16);
    let first = service
        .execute(input("missing", user_message, budget), tx, CancellationToken::new())
        .await
        .unwrap();

    let mut chat_id = first.chat_id;
    for _ in 0..3 {
        let (tx, _rx) = mpsc::channel(16);
        let output = service
            .execute(input(&chat_id, user_message, budget), tx, CancellationToken::new())
            .await
            .unwrap();
        chat_id = output.chat_id;
    }

    let chat = gateway.find_by_chat_id(&chat_id).await.unwrap();
    assert!(chat.token_usage() <= budget);
    assert!(!chat.evicted_messages().is_empty());

    let sum: usize = chat.active_messages().iter().map(|m| m.token_count()).sum();
    assert_eq!(chat.token_usage(), sum);

    // Four turns appended nine messages in total (system + 4 pairs); nothing
    // was dropped, only moved to the evicted history.
    let total = chat.active_messages().len() + chat.evicted_messages().len();
    assert_eq!(total, 9);

    // The initial system message is the first thing evicted.
    assert_eq!(chat.evicted_messages()[0].role(), Role::System);
}

#[tokio::test]
async fn test_snapshot_relay_sees_growing_content() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(FileChatStore::new(dir.path()));
    let provider = Arc::new(ScriptedProvider::new("incremental"));
    let service = CompletionService::new(gateway, provider);

    let (tx, mut rx) = mpsc::channel::<StreamSnapshot>(16);
    let relay = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            seen.push(snapshot.content);
        }
        seen
    });

    let output = service
        .execute(input("missing", "go", 100_000), tx, CancellationToken::new())
        .await
        .unwrap();

    let seen = relay.await.unwrap();
    assert!(!seen.is_empty());
    for pair in seen.windows(2) {
        assert!(pair[1].len() > pair[0].len());
        assert!(pair[1].starts_with(pair[0].as_str()));
    }
    assert_eq!(seen.last().unwrap(), &output.content);
}
