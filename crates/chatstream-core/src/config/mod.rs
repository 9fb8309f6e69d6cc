//! Configuration loading and validation.

mod loader;
mod schema;

pub use schema::{CompletionSettings, Config, ModelSettings};
