// tests/web_api.rs


use axum::body::Body;
use axum::http::{Request, StatusCode};
use chatgate::config::ContactConfig;
use chatgate::gateway::CHAT_FALLBACK;
use chatgate::web::api::{CONTACT_FAILURE, CONTACT_SUCCESS};
use chatgate::web::create_router;
use chatgate::web::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{FakeProvider, RecordingMailer, app_state};
use tower::ServiceExt;

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_router(app_state(FakeProvider::default(), None));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

// ============================================================================
// Mobile endpoint
// ============================================================================

#[tokio::test]
async fn test_mobile_chat_returns_text() {
    let app = create_router(app_state(FakeProvider::default(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({
            "action": "chat",
            "payload": {
                "history": [
                    { "role": "user", "content": "hi" },
                    { "role": "model", "content": "hello" }
                ],
                "prompt": "how are you"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "echo: how are you" }));
}

#[tokio::test]
async fn test_mobile_chat_failure_returns_fallback_text() {
    let app = create_router(app_state(FakeProvider::failing(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({ "action": "chat", "payload": { "prompt": "hello" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], CHAT_FALLBACK);
}

#[tokio::test]
async fn test_mobile_image_returns_data_uri() {
    let app = create_router(app_state(FakeProvider::default(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({ "action": "image", "payload": { "prompt": "a red fox" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image"], "data:image/png;base64,iVBORw0KGgo");
}

#[tokio::test]
async fn test_mobile_image_failure_is_500_without_detail() {
    let app = create_router(app_state(FakeProvider::failing(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({ "action": "image", "payload": { "prompt": "a red fox" } }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(!error.is_empty());
    assert!(!error.contains("exploded"));
}

#[tokio::test]
async fn test_mobile_audio_returns_transcript() {
    let app = create_router(app_state(FakeProvider::default(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({
            "action": "audio",
            "payload": { "audio": "data:audio/webm;base64,GkXfo59ChoEB" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "transcribed words" }));
}

#[tokio::test]
async fn test_mobile_unknown_action_is_400() {
    let app = create_router(app_state(FakeProvider::default(), None));
    let (status, body) = post_json(
        app,
        "/api/mobile",
        json!({ "action": "video", "payload": { "prompt": "x" } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_mobile_without_provider_is_503() {
    let state = AppState::new(None, None, ContactConfig::default());
    let (status, _) = post_json(
        create_router(state),
        "/api/mobile",
        json!({ "action": "chat", "payload": { "prompt": "hello" } }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Typed endpoints
// ============================================================================

#[tokio::test]
async fn test_chat_route_returns_reply() {
    let (status, body) = post_json(
        create_router(app_state(FakeProvider::default(), None)),
        "/api/chat",
        json!({
            "history": [{ "role": "user", "content": "hi" }],
            "prompt": "and now?"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "echo: and now?" }));
}

#[tokio::test]
async fn test_chat_route_blank_prompt_is_400() {
    let (status, body) = post_json(
        create_router(app_state(FakeProvider::default(), None)),
        "/api/chat",
        json!({ "prompt": "   " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_route_failure_returns_fallback() {
    let (status, body) = post_json(
        create_router(app_state(FakeProvider::failing(), None)),
        "/api/chat",
        json!({ "prompt": "hello" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": CHAT_FALLBACK }));
}

#[tokio::test]
async fn test_image_route_reports_missing_image() {
    let provider = FakeProvider {
        no_image: true,
        ..Default::default()
    };
    let (status, body) = post_json(
        create_router(app_state(provider, None)),
        "/api/image",
        json!({ "prompt": "a red fox" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No image was generated. Try a different description.");
}

#[tokio::test]
async fn test_audio_route_rejects_bad_payload() {
    let (status, _) = post_json(
        create_router(app_state(FakeProvider::default(), None)),
        "/api/audio",
        json!({ "audio": "data:text/plain;base64,aGk=" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Contact form
// ============================================================================

#[tokio::test]
async fn test_contact_success_forwards_email() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = create_router(app_state(FakeProvider::default(), Some(mailer.clone())));
    let (status, body) = post_json(
        app,
        "/api/contact",
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "message": "I'd like to talk about engines."
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": CONTACT_SUCCESS }));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_contact_validation_errors_are_400() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = create_router(app_state(FakeProvider::default(), Some(mailer.clone())));
    let (status, body) = post_json(
        app,
        "/api/contact",
        json!({ "name": "A", "email": "not-an-email", "message": "short" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["errors"]["name"].is_string());
    assert!(body["errors"]["email"].is_string());
    assert!(body["errors"]["message"].is_string());
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_contact_delivery_failure_is_500() {
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let app = create_router(app_state(FakeProvider::default(), Some(mailer)));
    let (status, body) = post_json(
        app,
        "/api/contact",
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "message": "I'd like to talk about engines."
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": CONTACT_FAILURE }));
}
