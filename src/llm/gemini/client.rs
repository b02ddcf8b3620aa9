// src/llm/gemini/client.rs
// Google Gemini API client (non-streaming)
// Chat, image generation and audio transcription all go through generateContent

use crate::config::ModelConfig;
use crate::conversation::Message;
use crate::http::create_shared_client;
use crate::llm::gemini::conversion::{audio_contents, chat_contents, user_text};
use crate::llm::gemini::extraction::{extract_image, extract_text, first_content};
use crate::llm::gemini::types::{GeminiRequest, GeminiResponse, GenerationConfig};
use crate::llm::http_client::LlmHttpClient;
use crate::llm::provider::{AiProvider, AudioInput, GeneratedImage};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    chat_model: String,
    image_model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with default models
    pub fn new(api_key: String) -> Self {
        Self::with_models(api_key, &ModelConfig::default())
    }

    /// Create a new Gemini client with configured models
    pub fn with_models(api_key: String, models: &ModelConfig) -> Self {
        Self::with_http_client(api_key, models, create_shared_client())
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(
        api_key: String,
        models: &ModelConfig,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            chat_model: models.chat.clone(),
            image_model: models.image.clone(),
            base_url: GEMINI_API_BASE.to_string(),
            http: LlmHttpClient::from_client(client),
        }
    }

    /// Transport retries for 429/5xx and connect failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.http = self.http.with_max_attempts(max_retries);
        self
    }

    /// Point at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }

    /// POST a generateContent request and parse the response
    async fn generate(
        &self,
        request_id: &str,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        let url = self.endpoint(model);
        let body = serde_json::to_string(request)?;
        debug!(request_id = %request_id, model, bytes = body.len(), "Gemini request");

        let response_body = self
            .http
            .execute_request_with_retry(request_id, body, |client, body| {
                client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .header("x-goog-api-key", &self.api_key)
                    .body(body)
            })
            .await?;

        let data: GeminiResponse = serde_json::from_str(&response_body)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        if let Some(reason) = data.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            warn!(request_id = %request_id, reason = %reason, "Gemini blocked the prompt");
        }

        if let Some(ref u) = data.usage_metadata {
            info!(
                request_id = %request_id,
                prompt_tokens = u.prompt_token_count,
                completion_tokens = u.candidates_token_count.unwrap_or(0),
                total_tokens = u.total_token_count,
                "Gemini usage"
            );
        }

        Ok(data)
    }

    fn text_from(response: &GeminiResponse) -> Result<String> {
        first_content(response)
            .and_then(extract_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("Gemini returned no text"))
    }
}

#[async_trait]
impl AiProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(
        skip(self, history, prompt),
        fields(request_id, model = %self.chat_model, message_count = history.len())
    )]
    async fn chat(&self, history: &[Message], prompt: &str) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        let request = GeminiRequest {
            contents: chat_contents(history, prompt),
            generation_config: None,
        };

        let response = self.generate(&request_id, &self.chat_model, &request).await?;
        let text = Self::text_from(&response)?;

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            content_len = text.len(),
            "Gemini chat complete"
        );
        Ok(text)
    }

    #[instrument(skip(self, prompt), fields(request_id, model = %self.image_model))]
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        // The image model refuses IMAGE-only modalities
        let request = GeminiRequest {
            contents: vec![user_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT".into(), "IMAGE".into()],
            }),
        };

        let response = self.generate(&request_id, &self.image_model, &request).await?;
        let image = first_content(&response).and_then(extract_image);

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            has_image = image.is_some(),
            "Gemini image generation complete"
        );
        Ok(image)
    }

    #[instrument(
        skip(self, audio, instruction),
        fields(request_id, model = %self.chat_model, mime = %audio.mime_type)
    )]
    async fn transcribe_audio(&self, audio: &AudioInput, instruction: &str) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        let request = GeminiRequest {
            contents: audio_contents(audio, instruction),
            generation_config: None,
        };

        let response = self.generate(&request_id, &self.chat_model, &request).await?;
        let text = Self::text_from(&response)?;

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            content_len = text.len(),
            "Gemini transcription complete"
        );
        Ok(text.trim().to_string())
    }
}
