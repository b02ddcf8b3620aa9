// src/contact/mailer.rs
// Outbound email through an HTTP email API

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::{ChatGateError, Result};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// A plain-text email ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

/// Sends through the Resend REST API
pub struct ResendMailer {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            url: RESEND_API_URL.to_string(),
            client,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatGateError::Email(format!("API error {}: {}", status, body)));
        }

        debug!(status = %status, "Email accepted by provider");
        Ok(())
    }
}
