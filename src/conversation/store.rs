// src/conversation/store.rs
// In-memory conversation list mirrored to durable storage after every mutation

use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::StateStorage;
use super::types::{Conversation, Message, Role, derive_title};
use crate::error::ChatGateError;

/// Storage key holding the serialized conversation list
pub const STORAGE_KEY: &str = "conversations";

/// Ordered conversation threads, most recent first.
///
/// The in-memory list is the source of truth; storage is only read once, in
/// [`ConversationStore::load`].
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    storage: Arc<dyn StateStorage>,
}

impl ConversationStore {
    /// Hydrate from storage. Absent or unreadable state yields an empty store.
    pub fn load(storage: Arc<dyn StateStorage>) -> Self {
        let conversations = match storage.load(STORAGE_KEY) {
            Ok(Some(doc)) => match serde_json::from_str::<Vec<Conversation>>(&doc) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "Persisted conversations are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted conversations, starting empty");
                Vec::new()
            }
        };

        debug!(count = conversations.len(), "Conversation store loaded");
        Self {
            conversations,
            storage,
        }
    }

    /// Insert a new empty conversation at the head and return its id
    pub fn create_conversation(&mut self) -> String {
        let id = self.next_id();
        self.conversations.insert(0, Conversation::new(id.clone()));
        self.persist();
        id
    }

    /// Append to a conversation, naming it on its first user message.
    ///
    /// Unknown ids are ignored.
    pub fn append_message(&mut self, id: &str, message: Message) {
        let Some(conv) = self.conversations.iter_mut().find(|c| c.id == id) else {
            debug!(id, "append_message on unknown conversation ignored");
            return;
        };

        if message.role() == Role::User && !has_titled_user_message(conv) {
            let title = derive_title(message.content());
            if !title.is_empty() {
                conv.title = title;
            }
        }

        conv.messages.push(message);
        self.persist();
    }

    /// Remove a conversation. Returns whether anything was removed.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        let removed = self.conversations.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Set a conversation's title. Unknown ids are ignored.
    pub fn rename(&mut self, id: &str, title: impl Into<String>) {
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == id) {
            conv.title = title.into();
            self.persist();
        }
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All conversations in display order
    pub fn list(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn most_recent(&self) -> Option<&Conversation> {
        self.conversations.first()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Millisecond timestamp, nudged forward until unique within the store
    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Mirror the full list to storage. Failures are logged, never surfaced.
    fn persist(&self) {
        let result = if self.conversations.is_empty() {
            self.storage.remove(STORAGE_KEY)
        } else {
            serde_json::to_string(&self.conversations)
                .map_err(ChatGateError::from)
                .and_then(|doc| self.storage.save(STORAGE_KEY, &doc))
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist conversations");
        }
    }
}

/// Whether an earlier user message already named the conversation
fn has_titled_user_message(conv: &Conversation) -> bool {
    conv.messages
        .iter()
        .any(|m| m.role() == Role::User && !derive_title(m.content()).is_empty())
}
