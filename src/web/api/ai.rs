// src/web/api/ai.rs
// AI gateway handlers: discriminated mobile endpoint plus typed routes

use axum::{Json, extract::State};
use serde_json::Value;
use tracing::{info, warn};

use crate::gateway::{AudioPayload, ChatPayload, GatewayRequest, GatewayResponse, ImagePayload};
use crate::web::error::{ApiError, ApiResult, GENERIC_FAILURE};
use crate::web::state::AppState;

/// `POST /api/mobile` - `{ action, payload }` dispatched to one capability
pub async fn mobile(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<GatewayResponse>> {
    let request: GatewayRequest = serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, "Rejected mobile request");
        ApiError::bad_request("Invalid request: expected { action: chat|image|audio, payload }")
    })?;

    let gateway = state.gateway()?;
    info!(action = action_name(&request), "Mobile request");

    gateway
        .dispatch(request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway(e, GENERIC_FAILURE))
}

/// `POST /api/chat` - always answers; provider failures yield the fallback text
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> ApiResult<Json<GatewayResponse>> {
    let gateway = state.gateway()?;
    gateway
        .dispatch(GatewayRequest::Chat(payload))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_gateway(e, GENERIC_FAILURE))
}

/// `POST /api/image`
pub async fn image(
    State(state): State<AppState>,
    Json(payload): Json<ImagePayload>,
) -> ApiResult<Json<GatewayResponse>> {
    let gateway = state.gateway()?;
    match gateway.generate_image(&payload.prompt).await {
        Ok(image) => Ok(Json(GatewayResponse::Image { image })),
        Err(e) => {
            let message = e.to_user_string();
            Err(ApiError::from_gateway(e, message))
        }
    }
}

/// `POST /api/audio`
pub async fn audio(
    State(state): State<AppState>,
    Json(payload): Json<AudioPayload>,
) -> ApiResult<Json<GatewayResponse>> {
    let gateway = state.gateway()?;
    gateway
        .dispatch(GatewayRequest::Audio(payload))
        .await
        .map(Json)
        .map_err(|e| {
            let message = e.to_user_string();
            ApiError::from_gateway(e, message)
        })
}

fn action_name(request: &GatewayRequest) -> &'static str {
    match request {
        GatewayRequest::Chat(_) => "chat",
        GatewayRequest::Image(_) => "image",
        GatewayRequest::Audio(_) => "audio",
    }
}
