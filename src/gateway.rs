// src/gateway.rs
// AI gateway: stateless dispatch to chat, image generation or transcription

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::conversation::Message;
use crate::error::{ChatGateError, Result};
use crate::llm::{AiProvider, AudioInput};

/// Returned in place of a chat reply when the provider fails
pub const CHAT_FALLBACK: &str =
    "Sorry, I couldn't process that request right now. Please try again.";

/// Fixed instruction sent alongside audio clips
pub const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe this audio accurately. Return only the transcribed text.";

/// Discriminated request accepted by the mobile endpoint:
/// `{ "action": "chat" | "image" | "audio", "payload": { ... } }`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", content = "payload", rename_all = "lowercase")]
pub enum GatewayRequest {
    Chat(ChatPayload),
    Image(ImagePayload),
    Audio(AudioPayload),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub history: Vec<Message>,
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagePayload {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioPayload {
    /// Data URI or raw base64
    pub audio: String,
    #[serde(default, alias = "mimeType")]
    pub mime_type: Option<String>,
}

/// Uniform result shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GatewayResponse {
    Text { text: String },
    Image { image: String },
}

/// Stateless wrapper around one [`AiProvider`]
#[derive(Clone)]
pub struct AiGateway {
    provider: Arc<dyn AiProvider>,
}

impl AiGateway {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    /// Chat completion. Provider failures and empty replies degrade to [`CHAT_FALLBACK`].
    pub async fn chat(&self, history: &[Message], prompt: &str) -> String {
        match self.provider.chat(history, prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(provider = self.provider.name(), "Empty chat completion, using fallback");
                CHAT_FALLBACK.to_string()
            }
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "Chat request failed");
                CHAT_FALLBACK.to_string()
            }
        }
    }

    /// Generate an image and return it as a data URI
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatGateError::InvalidInput("image prompt is empty".into()));
        }

        let image = self.provider.generate_image(prompt).await.map_err(|e| {
            error!(provider = self.provider.name(), error = %e, "Image generation failed");
            ChatGateError::Provider(e.to_string())
        })?;

        match image {
            Some(image) => {
                info!(mime = %image.mime_type, "Image generated");
                Ok(image.to_data_uri())
            }
            None => {
                warn!(provider = self.provider.name(), "Provider returned no image");
                Err(ChatGateError::NoImageReturned)
            }
        }
    }

    /// Transcribe an audio clip with the fixed instruction
    pub async fn transcribe_audio(&self, audio: &AudioInput) -> Result<String> {
        self.provider
            .transcribe_audio(audio, TRANSCRIBE_INSTRUCTION)
            .await
            .map_err(|e| {
                error!(provider = self.provider.name(), error = %e, "Transcription failed");
                ChatGateError::Provider(e.to_string())
            })
    }

    /// Route a discriminated request to the matching capability
    pub async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        match request {
            GatewayRequest::Chat(payload) => {
                if payload.prompt.trim().is_empty() {
                    return Err(ChatGateError::InvalidInput("prompt is empty".into()));
                }
                let text = self.chat(&payload.history, &payload.prompt).await;
                Ok(GatewayResponse::Text { text })
            }
            GatewayRequest::Image(payload) => {
                let image = self.generate_image(&payload.prompt).await?;
                Ok(GatewayResponse::Image { image })
            }
            GatewayRequest::Audio(payload) => {
                let audio = AudioInput::parse(&payload.audio, payload.mime_type.as_deref())
                    .map_err(|e| ChatGateError::InvalidInput(e.to_string()))?;
                let text = self.transcribe_audio(&audio).await?;
                Ok(GatewayResponse::Text { text })
            }
        }
    }
}
