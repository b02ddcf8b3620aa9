// src/web/error.rs
// Error responses for the HTTP API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::ChatGateError;

/// Generic message for provider failures on the mobile endpoint
pub const GENERIC_FAILURE: &str = "Failed to process request";

/// Standard API error response
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: Some("INTERNAL_ERROR".to_string()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
            error_code: Some("BAD_REQUEST".to_string()),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::SERVICE_UNAVAILABLE,
            error_code: Some("SERVICE_UNAVAILABLE".to_string()),
        }
    }

    /// Map a gateway error: bad input is the caller's fault, everything
    /// else becomes a 500 with `message` and no provider detail.
    pub fn from_gateway(err: ChatGateError, message: impl Into<String>) -> Self {
        match err {
            ChatGateError::InvalidInput(msg) => Self::bad_request(msg),
            other => {
                error!(error = %other, "Gateway request failed");
                Self::internal(message)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });
        if let Some(error_code) = self.error_code {
            body["error_code"] = json!(error_code);
        }
        (self.status_code, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err =
            ApiError::from_gateway(ChatGateError::InvalidInput("prompt is empty".into()), "x");
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "prompt is empty");
    }

    #[test]
    fn test_provider_error_hides_detail() {
        let err = ApiError::from_gateway(
            ChatGateError::Provider("API error 500: secret".into()),
            GENERIC_FAILURE,
        );
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, GENERIC_FAILURE);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::service_unavailable("down").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
