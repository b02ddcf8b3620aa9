// src/conversation/mod.rs
// Conversation threads, their durable mirror, and prompt composition

pub mod composer;
pub mod storage;
pub mod store;
pub mod types;

pub use composer::{Command, ComposedPrompt, compose, parse_command};
pub use storage::{JsonFileStorage, MemoryStorage, StateStorage};
pub use store::ConversationStore;
pub use types::{Conversation, Message, Role};
