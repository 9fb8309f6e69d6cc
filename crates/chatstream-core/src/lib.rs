//! # chatstream-core
//!
//! Domain types and invariants for chatstream.
//!
//! This crate holds the conversation state machine shared by the rest of the
//! workspace:
//!
//! - **Types**: `Model`, `Message`, `ChatConfig`, and the `Chat` aggregate
//!   with its token-budget eviction policy
//! - **Tokenizer**: the pluggable token-counting seam
//! - **Configuration**: loading and validation of the JSON5 config file
//! - **Utilities**: ID generation

pub mod config;
pub mod error;
pub mod id;
pub mod tokenizer;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ChatError, ConfigError, Result};
pub use tokenizer::{HeuristicTokenizer, Tokenizer};
pub use types::*;
