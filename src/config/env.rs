// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default chat / transcription model
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

/// Default image generation model
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Guest sends allowed per session before sign-in is required
pub const DEFAULT_GUEST_LIMIT: u32 = 15;

/// Sender used when CONTACT_FROM_EMAIL is not set
pub const DEFAULT_CONTACT_FROM: &str = "onboarding@resend.dev";

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
    /// Resend email API key (RESEND_API_KEY)
    pub resend: Option<String>,
}

impl ApiKeys {
    /// Load API keys from environment variables
    pub fn from_env() -> Self {
        let gemini = Self::read_key("GEMINI_API_KEY").or_else(|| Self::read_key("GOOGLE_API_KEY"));
        let resend = Self::read_key("RESEND_API_KEY");

        let keys = Self { gemini, resend };
        keys.log_status();
        keys
    }

    /// Read a single API key from environment, filtering empty values
    fn read_key(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|k| !k.trim().is_empty())
    }

    /// Log which API keys are available (without exposing values)
    fn log_status(&self) {
        let mut available = Vec::new();
        if self.gemini.is_some() {
            available.push("Gemini");
        }
        if self.resend.is_some() {
            available.push("Resend");
        }

        if available.is_empty() {
            warn!("No API keys configured - AI and email features will be unavailable");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }

    pub fn has_ai_provider(&self) -> bool {
        self.gemini.is_some()
    }

    pub fn has_email(&self) -> bool {
        self.resend.is_some()
    }
}

/// Model selection (CHATGATE_CHAT_MODEL, CHATGATE_IMAGE_MODEL)
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub chat: String,
    pub image: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: DEFAULT_CHAT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chat: non_empty_env("CHATGATE_CHAT_MODEL").unwrap_or(defaults.chat),
            image: non_empty_env("CHATGATE_IMAGE_MODEL").unwrap_or(defaults.image),
        }
    }
}

/// Contact form routing (CONTACT_TO_EMAIL, CONTACT_FROM_EMAIL)
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Inbox that receives contact submissions
    pub to: Option<String>,
    /// Verified sender address for the email API
    pub from: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            to: None,
            from: DEFAULT_CONTACT_FROM.to_string(),
        }
    }
}

impl ContactConfig {
    pub fn from_env() -> Self {
        Self {
            to: non_empty_env("CONTACT_TO_EMAIL"),
            from: non_empty_env("CONTACT_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_CONTACT_FROM.to_string()),
        }
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub models: ModelConfig,
    pub contact: ContactConfig,
    /// Transport-level retries for provider calls (GEMINI_MAX_RETRIES)
    pub max_retries: u32,
    /// Guest send threshold (CHATGATE_GUEST_LIMIT)
    pub guest_limit: u32,
    /// Local state directory (CHATGATE_DATA_DIR)
    pub data_dir: PathBuf,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            models: ModelConfig::default(),
            contact: ContactConfig::default(),
            max_retries: 0,
            guest_limit: DEFAULT_GUEST_LIMIT,
            data_dir: default_data_dir(),
        }
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");

        Self {
            api_keys: ApiKeys::from_env(),
            models: ModelConfig::from_env(),
            contact: ContactConfig::from_env(),
            max_retries: parse_u32(non_empty_env("GEMINI_MAX_RETRIES"), "GEMINI_MAX_RETRIES")
                .unwrap_or(0),
            guest_limit: parse_u32(non_empty_env("CHATGATE_GUEST_LIMIT"), "CHATGATE_GUEST_LIMIT")
                .unwrap_or(DEFAULT_GUEST_LIMIT),
            data_dir: non_empty_env("CHATGATE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if !self.api_keys.has_ai_provider() {
            validation.add_warning("No Gemini API key configured. Set GEMINI_API_KEY.");
        }

        if !self.api_keys.has_email() {
            validation.add_warning(
                "No email API key configured. Set RESEND_API_KEY for the contact form.",
            );
        } else if self.contact.to.is_none() {
            validation.add_error("RESEND_API_KEY is set but CONTACT_TO_EMAIL is missing.");
        }

        if self.guest_limit == 0 {
            validation.add_warning(
                "CHATGATE_GUEST_LIMIT is 0: guests must sign in before their first message.",
            );
        }

        validation
    }
}

/// `~/.chatgate`, falling back to the working directory when no home is known
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatgate")
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_u32(value: Option<String>, name: &str) -> Option<u32> {
    let value = value?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(name, value = %value, "Ignoring non-numeric value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_default() {
        let keys = ApiKeys::default();
        assert!(!keys.has_ai_provider());
        assert!(!keys.has_email());
    }

    #[test]
    fn test_model_defaults() {
        let models = ModelConfig::default();
        assert_eq!(models.chat, DEFAULT_CHAT_MODEL);
        assert_eq!(models.image, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32(Some("20".into()), "X"), Some(20));
        assert_eq!(parse_u32(Some(" 3 ".into()), "X"), Some(3));
        assert_eq!(parse_u32(Some("lots".into()), "X"), None);
        assert_eq!(parse_u32(None, "X"), None);
    }

    #[test]
    fn test_validation_no_keys() {
        let config = EnvConfig::default();
        let validation = config.validate();
        assert!(validation.is_valid()); // Warnings don't make it invalid
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn test_validation_email_without_recipient() {
        let config = EnvConfig {
            api_keys: ApiKeys {
                gemini: Some("key".into()),
                resend: Some("re_key".into()),
            },
            ..EnvConfig::default()
        };
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.report().contains("CONTACT_TO_EMAIL"));
    }

    #[test]
    fn test_report_ok() {
        assert_eq!(ConfigValidation::new().report(), "Configuration OK");
    }

    #[test]
    fn test_default_guest_limit() {
        assert_eq!(EnvConfig::default().guest_limit, 15);
    }
}
