// src/llm/provider.rs
// Provider abstraction: the three capabilities the gateway dispatches to

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::Message;

/// Inline image returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

impl GeneratedImage {
    /// `data:<mime>;base64,<data>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Audio payload for transcription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInput {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

impl AudioInput {
    /// Default when neither the data URI nor the caller names a type
    pub const DEFAULT_MIME: &'static str = "audio/webm";

    /// Accept either a `data:audio/...;base64,...` URI or raw base64 plus an optional MIME type
    pub fn parse(audio: &str, mime_type: Option<&str>) -> Result<Self> {
        let audio = audio.trim();
        if audio.is_empty() {
            bail!("audio payload is empty");
        }

        if let Some(rest) = audio.strip_prefix("data:") {
            let Some((header, data)) = rest.split_once(',') else {
                bail!("malformed data URI");
            };
            let Some(mime) = header.strip_suffix(";base64") else {
                bail!("audio data URI must be base64-encoded");
            };
            // e.g. "audio/webm;codecs=opus" -> "audio/webm"
            let mime = mime.split(';').next().unwrap_or_default();
            if !mime.starts_with("audio/") {
                bail!("expected an audio MIME type, got '{}'", mime);
            }
            if data.is_empty() {
                bail!("audio payload is empty");
            }
            return Ok(Self {
                mime_type: mime.to_string(),
                data: data.to_string(),
            });
        }

        Ok(Self {
            mime_type: mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(Self::DEFAULT_MIME)
                .to_string(),
            data: audio.to_string(),
        })
    }
}

/// A generative-AI backend. Implementations hold no per-call state.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Text completion for `prompt` given prior `history`
    async fn chat(&self, history: &[Message], prompt: &str) -> Result<String>;

    /// Image for `prompt`; `Ok(None)` when the provider returned no media
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>>;

    /// Run `instruction` against the audio clip
    async fn transcribe_audio(&self, audio: &AudioInput, instruction: &str) -> Result<String>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}
