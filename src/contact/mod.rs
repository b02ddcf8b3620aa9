// src/contact/mod.rs
// Contact form: field validation and forwarding as outbound email

pub mod mailer;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::config::ContactConfig;
use crate::error::{ChatGateError, Result};
pub use mailer::{Mailer, OutboundEmail, ResendMailer};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

/// A contact form submission as received
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation messages, keyed by field name
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Why a submission was not forwarded
#[derive(Debug)]
pub enum ContactError {
    Invalid(FieldErrors),
    Delivery(ChatGateError),
}

pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

impl ContactSubmission {
    /// Check every field; the map is empty when the submission is valid
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            errors.insert(
                "name",
                format!("Name must be at least {} characters.", MIN_NAME_CHARS),
            );
        }
        if !is_valid_email(self.email.trim()) {
            errors.insert("email", "Please enter a valid email address.".to_string());
        }
        if self.message.trim().chars().count() < MIN_MESSAGE_CHARS {
            errors.insert(
                "message",
                format!("Message must be at least {} characters.", MIN_MESSAGE_CHARS),
            );
        }

        errors
    }

    /// Build the email delivered to the site owner
    pub fn to_email(&self, config: &ContactConfig) -> Result<OutboundEmail> {
        let to = config
            .to
            .clone()
            .ok_or_else(|| ChatGateError::Config("CONTACT_TO_EMAIL is not set".into()))?;
        let name = self.name.trim();
        let email = self.email.trim();

        Ok(OutboundEmail {
            from: config.from.clone(),
            to,
            reply_to: Some(email.to_string()),
            subject: format!("New contact form message from {}", name),
            text: format!(
                "Name: {}\nEmail: {}\n\n{}",
                name,
                email,
                self.message.trim()
            ),
        })
    }
}

/// Validate a submission and hand it to the mailer
pub async fn forward_contact(
    mailer: &dyn Mailer,
    config: &ContactConfig,
    submission: &ContactSubmission,
) -> std::result::Result<(), ContactError> {
    let errors = submission.validate();
    if !errors.is_empty() {
        return Err(ContactError::Invalid(errors));
    }

    let email = submission.to_email(config).map_err(ContactError::Delivery)?;
    match mailer.send(&email).await {
        Ok(()) => {
            info!(to = %email.to, "Contact message forwarded");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to forward contact message");
            Err(ContactError::Delivery(e))
        }
    }
}
