// src/cli/clients.rs
// Client initialization helpers for the AI provider and mailer

use chatgate::config::EnvConfig;
use chatgate::contact::{Mailer, ResendMailer};
use chatgate::gateway::AiGateway;
use chatgate::llm::GeminiClient;
use std::sync::Arc;
use tracing::info;

/// Build the AI gateway if a Gemini key is available
pub fn get_gateway(config: &EnvConfig, http_client: reqwest::Client) -> Option<AiGateway> {
    let api_key = config.api_keys.gemini.clone()?;
    let client = GeminiClient::with_http_client(api_key, &config.models, http_client)
        .with_max_retries(config.max_retries);

    info!(
        chat_model = %config.models.chat,
        image_model = %config.models.image,
        "Gemini provider enabled"
    );
    Some(AiGateway::new(Arc::new(client)))
}

/// Build the contact mailer if a Resend key is available
pub fn get_mailer(config: &EnvConfig, http_client: reqwest::Client) -> Option<Arc<dyn Mailer>> {
    let api_key = config.api_keys.resend.clone()?;
    info!("Contact form email enabled (Resend)");
    Some(Arc::new(ResendMailer::new(api_key, http_client)))
}
