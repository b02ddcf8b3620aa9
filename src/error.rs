// src/error.rs
// Standardized error types for chatgate

use thiserror::Error;

/// Main error type for the chatgate library
#[derive(Error, Debug)]
pub enum ChatGateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("no image returned by provider")]
    NoImageReturned,

    #[error("email error: {0}")]
    Email(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using ChatGateError
pub type Result<T> = std::result::Result<T, ChatGateError>;

impl ChatGateError {
    /// Coarse message safe to show to an end user.
    ///
    /// Provider and transport details stay in the logs.
    pub fn to_user_string(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::NoImageReturned => "No image was generated. Try a different description.".into(),
            Self::Config(_) => "The service is not configured.".into(),
            Self::Email(_) => "Failed to send message.".into(),
            _ => "Something went wrong. Please try again.".into(),
        }
    }
}
