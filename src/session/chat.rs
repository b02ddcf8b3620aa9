// src/session/chat.rs
// Client chat session: active thread selection and the send flow

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::rate_gate::{GateDecision, SessionRateGate};
use crate::conversation::{
    Command, Conversation, ConversationStore, Message, compose, parse_command,
};
use crate::error::Result;
use crate::gateway::AiGateway;
use crate::llm::AudioInput;

/// Prefix of the model message recorded when image generation fails
pub const IMAGE_FAILURE_PREFIX: &str = "Image generation failed";

/// What happened to one `send` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing sent
    Ignored,
    /// Guest limit reached; show the sign-in prompt
    AuthRequired,
    /// Chat reply (possibly the fallback text)
    Reply(String),
    /// Image reference for a `/imagine` request
    Image(String),
    /// Image generation failed; carries the message shown in the thread
    Failed(String),
}

/// Sets the loading flag on creation and clears it on drop, so the flag
/// cannot stay set after a failed or abandoned request.
struct LoadingGuard(Arc<AtomicBool>);

impl LoadingGuard {
    fn start(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag.clone())
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One client session over a conversation store.
///
/// Exactly one conversation is active at any time.
pub struct ChatSession {
    store: ConversationStore,
    gateway: AiGateway,
    gate: SessionRateGate,
    active_id: String,
    authenticated: bool,
    loading: Arc<AtomicBool>,
}

impl ChatSession {
    /// Activate the most recent conversation, creating one for an empty store
    pub fn open(mut store: ConversationStore, gateway: AiGateway, gate: SessionRateGate) -> Self {
        let active_id = match store.most_recent() {
            Some(conv) => conv.id.clone(),
            None => store.create_conversation(),
        };

        Self {
            store,
            gateway,
            gate,
            active_id,
            authenticated: false,
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.store.get(&self.active_id)
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.store.list()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle on the loading flag for observers running beside `send`
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        self.loading.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn sign_in(&mut self) {
        self.authenticated = true;
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
    }

    pub fn remaining_guest_sends(&self) -> u32 {
        self.gate.remaining()
    }

    /// Start a new thread. An already-empty active thread is reused.
    pub fn new_conversation(&mut self) -> &str {
        if !self.active().is_some_and(Conversation::is_empty) {
            self.active_id = self.store.create_conversation();
        }
        &self.active_id
    }

    /// Activate `id`. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.store.contains(id) {
            self.active_id = id.to_string();
            true
        } else {
            false
        }
    }

    /// Delete a thread. Deleting the active one selects the most recent
    /// remaining thread, or a fresh empty one when none remain.
    pub fn delete_conversation(&mut self, id: &str) {
        if !self.store.delete_conversation(id) || id != self.active_id {
            return;
        }

        self.active_id = match self.store.most_recent() {
            Some(conv) => conv.id.clone(),
            None => self.store.create_conversation(),
        };
        debug!(active = %self.active_id, "Active conversation deleted, reselected");
    }

    /// Send user input in the active conversation
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.gate.check(self.authenticated) == GateDecision::RequireAuth {
            info!(count = self.gate.count(), "Guest limit reached, sign-in required");
            return SendOutcome::AuthRequired;
        }

        if !self.store.contains(&self.active_id) {
            self.active_id = self.store.create_conversation();
        }
        let id = self.active_id.clone();
        self.store.append_message(&id, Message::user(text));

        let _loading = LoadingGuard::start(&self.loading);

        match parse_command(text) {
            Command::Imagine(prompt) => match self.gateway.generate_image(prompt).await {
                Ok(image) => {
                    self.store.append_message(&id, Message::model(image.clone()));
                    SendOutcome::Image(image)
                }
                Err(e) => {
                    let failure = format!("{}: {}", IMAGE_FAILURE_PREFIX, e.to_user_string());
                    self.store.append_message(&id, Message::model(failure.clone()));
                    SendOutcome::Failed(failure)
                }
            },
            Command::Chat(prompt) => {
                let prior = self
                    .store
                    .get(&id)
                    .map(|c| c.messages.clone())
                    .unwrap_or_default();
                let composed = compose(&prior, prompt);
                let reply = self.gateway.chat(&composed.history, &composed.prompt).await;
                self.store.append_message(&id, Message::model(reply.clone()));
                SendOutcome::Reply(reply)
            }
        }
    }

    /// Transcribe a voice clip. The transcript is returned, not sent.
    pub async fn transcribe(&self, audio: &AudioInput) -> Result<String> {
        let _loading = LoadingGuard::start(&self.loading);
        self.gateway.transcribe_audio(audio).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{MemoryStorage, Role};
    use crate::gateway::CHAT_FALLBACK;
    use crate::llm::{AiProvider, GeneratedImage};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedProvider {
        fail_chat: bool,
        no_image: bool,
        chat_calls: Mutex<Vec<(usize, String)>>,
        image_calls: Mutex<Vec<String>>,
        loading_seen: Mutex<Vec<bool>>,
        watched_flag: Mutex<Option<Arc<AtomicBool>>>,
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        async fn chat(&self, history: &[Message], prompt: &str) -> anyhow::Result<String> {
            self.chat_calls
                .lock()
                .unwrap()
                .push((history.len(), prompt.to_string()));
            if let Some(flag) = self.watched_flag.lock().unwrap().as_ref() {
                self.loading_seen.lock().unwrap().push(flag.load(Ordering::SeqCst));
            }
            if self.fail_chat {
                return Err(anyhow!("timeout"));
            }
            Ok(format!("reply to {prompt}"))
        }

        async fn generate_image(&self, prompt: &str) -> anyhow::Result<Option<GeneratedImage>> {
            self.image_calls.lock().unwrap().push(prompt.to_string());
            if self.no_image {
                return Ok(None);
            }
            Ok(Some(GeneratedImage {
                mime_type: "image/png".into(),
                data: "iVBOR".into(),
            }))
        }

        async fn transcribe_audio(
            &self,
            _audio: &AudioInput,
            _instruction: &str,
        ) -> anyhow::Result<String> {
            Ok("spoken words".into())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn session_with(
        provider: ScriptedProvider,
        limit: u32,
    ) -> (ChatSession, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let store = ConversationStore::load(Arc::new(MemoryStorage::new()));
        let session = ChatSession::open(
            store,
            AiGateway::new(provider.clone()),
            SessionRateGate::new(limit),
        );
        (session, provider)
    }

    fn session() -> (ChatSession, Arc<ScriptedProvider>) {
        session_with(ScriptedProvider::default(), 15)
    }

    // ============================================================================
    // selection
    // ============================================================================

    #[test]
    fn test_open_empty_store_creates_active() {
        let (session, _) = session();
        assert_eq!(session.conversations().len(), 1);
        assert!(session.active().is_some());
    }

    #[test]
    fn test_new_conversation_reuses_empty_active() {
        let (mut session, _) = session();
        let first = session.active_id().to_string();
        assert_eq!(session.new_conversation(), first);
        assert_eq!(session.conversations().len(), 1);
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let (mut session, _) = session();
        let id = session.active_id().to_string();
        assert!(!session.select("nope"));
        assert_eq!(session.active_id(), id);
    }

    #[tokio::test]
    async fn test_delete_active_selects_most_recent() {
        let (mut session, _) = session();
        let older = session.active_id().to_string();
        session.send("first thread").await;
        let newer = session.new_conversation().to_string();
        session.send("second thread").await;

        session.delete_conversation(&newer);
        assert_eq!(session.active_id(), older);
        assert_eq!(session.conversations().len(), 1);
    }

    #[test]
    fn test_delete_last_creates_fresh() {
        let (mut session, _) = session();
        let only = session.active_id().to_string();
        session.delete_conversation(&only);

        assert_eq!(session.conversations().len(), 1);
        assert!(session.active().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_inactive_keeps_selection() {
        let (mut session, _) = session();
        let older = session.active_id().to_string();
        session.send("first").await;
        let newer = session.new_conversation().to_string();

        session.delete_conversation(&older);
        assert_eq!(session.active_id(), newer);
    }

    // ============================================================================
    // send: chat
    // ============================================================================

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let (mut session, provider) = session();
        let outcome = session.send("  hello there  ").await;
        assert_eq!(outcome, SendOutcome::Reply("reply to hello there".into()));

        let conv = session.active().unwrap();
        assert_eq!(conv.title, "hello there");
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role(), Role::User);
        assert_eq!(conv.messages[1].role(), Role::Model);

        // System turns only: the just-appended message goes out as the prompt
        let calls = provider.chat_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(2, "hello there".to_string())]);
    }

    #[tokio::test]
    async fn test_second_send_carries_history() {
        let (mut session, provider) = session();
        session.send("one").await;
        session.send("two").await;
        let calls = provider.chat_calls.lock().unwrap().clone();
        assert_eq!(calls[1], (4, "two".to_string()));
    }

    #[tokio::test]
    async fn test_chat_failure_records_fallback_and_clears_loading() {
        let (mut session, _) = session_with(
            ScriptedProvider {
                fail_chat: true,
                ..Default::default()
            },
            15,
        );
        let outcome = session.send("hi").await;
        assert_eq!(outcome, SendOutcome::Reply(CHAT_FALLBACK.into()));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flag_set_only_while_request_outstanding() {
        let (mut session, provider) = session_with(
            ScriptedProvider {
                fail_chat: true,
                ..Default::default()
            },
            15,
        );
        let flag = session.loading_flag();
        *provider.watched_flag.lock().unwrap() = Some(flag.clone());

        session.send("first").await;
        session.send("second").await;

        assert_eq!(provider.loading_seen.lock().unwrap().clone(), vec![true, true]);
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_blank_send_ignored() {
        let (mut session, provider) = session();
        assert_eq!(session.send("   ").await, SendOutcome::Ignored);
        assert!(provider.chat_calls.lock().unwrap().is_empty());
        assert!(session.active().unwrap().is_empty());
    }

    // ============================================================================
    // send: image
    // ============================================================================

    #[tokio::test]
    async fn test_imagine_never_reaches_chat() {
        let (mut session, provider) = session();
        let outcome = session.send("/imagine a cat").await;

        assert_eq!(outcome, SendOutcome::Image("data:image/png;base64,iVBOR".into()));
        assert!(provider.chat_calls.lock().unwrap().is_empty());
        assert_eq!(provider.image_calls.lock().unwrap().clone(), vec!["a cat"]);
        assert!(session.active().unwrap().messages[1].is_image());
    }

    #[tokio::test]
    async fn test_failed_image_is_visible() {
        let (mut session, _) = session_with(
            ScriptedProvider {
                no_image: true,
                ..Default::default()
            },
            15,
        );
        let outcome = session.send("/imagine a cat").await;

        let SendOutcome::Failed(message) = outcome.clone() else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(message.starts_with(IMAGE_FAILURE_PREFIX));
        let last = session.active().unwrap().messages.last().unwrap().clone();
        assert_eq!(last.content(), message);
        assert!(!last.content().is_empty());
        assert!(!session.is_loading());
    }

    // ============================================================================
    // rate gate
    // ============================================================================

    #[tokio::test]
    async fn test_sixteenth_guest_send_requires_auth() {
        let (mut session, provider) = session();
        for i in 0..15 {
            let outcome = session.send(&format!("message {i}")).await;
            assert!(matches!(outcome, SendOutcome::Reply(_)), "send {i}: {outcome:?}");
        }
        assert_eq!(session.send("one more").await, SendOutcome::AuthRequired);
        assert_eq!(provider.chat_calls.lock().unwrap().len(), 15);
        // Intercepted input is not appended
        assert_eq!(session.active().unwrap().messages.len(), 30);
    }

    #[tokio::test]
    async fn test_signed_in_user_bypasses_gate() {
        let (mut session, _) = session_with(ScriptedProvider::default(), 1);
        session.sign_in();
        for _ in 0..3 {
            assert!(matches!(session.send("hi").await, SendOutcome::Reply(_)));
        }
        assert_eq!(session.remaining_guest_sends(), 1);
    }

    // ============================================================================
    // transcription
    // ============================================================================

    #[tokio::test]
    async fn test_transcribe_returns_text_without_sending() {
        let (session, provider) = session();
        let audio = AudioInput::parse("UklG", Some("audio/wav")).unwrap();
        assert_eq!(session.transcribe(&audio).await.unwrap(), "spoken words");
        assert!(provider.chat_calls.lock().unwrap().is_empty());
        assert!(session.active().unwrap().is_empty());
        assert!(!session.is_loading());
    }
}
