//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! loaded back with identical field values, and bridged into a live chat.

use chatstream_core::{Chat, ChatConfig, Config, HeuristicTokenizer, Message, Role};
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chatstream.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    // Default model settings should survive the roundtrip
    assert_eq!(loaded.model.name, config.model.name);
    assert_eq!(loaded.model.max_context_tokens, config.model.max_context_tokens);
    // Default completion settings should survive the roundtrip
    assert_eq!(loaded.completion.temperature, config.completion.temperature);
    assert_eq!(loaded.completion.max_tokens, config.completion.max_tokens);
    assert_eq!(loaded.initial_system_message, config.initial_system_message);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chatstream.json5");

    let mut config = Config::default();
    config.model.max_context_tokens = 4_096;
    config.completion.temperature = 1.5;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.model.max_context_tokens, 4_096);
    assert_eq!(loaded.completion.temperature, 1.5);
}

#[test]
fn test_loaded_config_drives_a_chat() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chatstream.json5");

    let config = Config::default();
    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    let chat_config: ChatConfig = loaded.to_chat_config().unwrap();
    let system = Message::new(
        Role::System,
        loaded.initial_system_message.as_str(),
        &chat_config.model,
        &HeuristicTokenizer,
    )
    .unwrap();

    let chat = Chat::new("user-1", system, chat_config).unwrap();
    assert_eq!(chat.active_messages().len(), 1);
    assert!(chat.token_usage() <= chat.config().model.max_tokens());
}
