// src/web/api/contact.rs
// Contact form handler

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::contact::{ContactError, ContactSubmission, forward_contact};
use crate::web::state::AppState;

pub const CONTACT_SUCCESS: &str = "Thanks for reaching out! We'll get back to you soon.";
pub const CONTACT_FAILURE: &str = "Failed to send message. Please try again later.";

/// `POST /api/contact`
pub async fn submit(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> (StatusCode, Json<Value>) {
    let Some(mailer) = state.mailer.as_deref() else {
        // Validation still runs so the form can show field errors
        let errors = submission.validate();
        if !errors.is_empty() {
            return invalid(errors);
        }
        warn!("Contact submission received but no mailer is configured");
        return failure();
    };

    match forward_contact(mailer, &state.contact, &submission).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": CONTACT_SUCCESS })),
        ),
        Err(ContactError::Invalid(errors)) => invalid(errors),
        Err(ContactError::Delivery(_)) => failure(),
    }
}

fn invalid(errors: crate::contact::FieldErrors) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "errors": errors })),
    )
}

fn failure() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": CONTACT_FAILURE })),
    )
}
