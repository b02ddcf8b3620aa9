// src/conversation/types.rs
// Conversation and message data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder title shown until the first user message names the thread
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of leading words used for an automatic title
pub const TITLE_WORDS: usize = 5;

/// Who authored a message, in the provider's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn. Fields are private so content and role never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the content is an image reference rather than text
    pub fn is_image(&self) -> bool {
        is_image_ref(&self.content)
    }
}

/// Data URIs for images, or bare http(s) links to common image formats
pub fn is_image_ref(content: &str) -> bool {
    let content = content.trim();
    if content.starts_with("data:image/") {
        return true;
    }
    if content.contains(char::is_whitespace) {
        return false;
    }
    let lower = content.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://"))
        && [".png", ".jpg", ".jpeg", ".gif", ".webp"]
            .iter()
            .any(|ext| lower.ends_with(ext))
}

/// One chat thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Title derived from the first five whitespace-separated words
pub fn derive_title(text: &str) -> String {
    text.split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
