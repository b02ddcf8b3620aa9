// src/web/api/mod.rs
// REST API handlers

mod ai;
mod contact;

use axum::{Json, response::IntoResponse};

pub use ai::{audio, chat, image, mobile};
pub use contact::{CONTACT_FAILURE, CONTACT_SUCCESS, submit as contact};

// ═══════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
