//! Common type definitions.

mod chat;
mod message;
mod model;

pub use chat::{Chat, ChatConfig, ChatStatus};
pub use message::{Message, Role};
pub use model::Model;
