//! API integration tests.
//!
//! The router is exercised end to end with an in-memory store and
//! disabled provider clients, so no network access is needed: chat falls
//! back to the stub and generation endpoints classify as disabled.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use lumen_api::auth::{Claims, JwtVerifier};
use lumen_api::services::KeywordAnalysis;
use lumen_api::{create_router, ApiConfig, AppState};
use lumen_providers::{
    AuthScheme, Credential, ElevenLabsClient, FalClient, OpenAiClient, ProviderConfig,
};
use lumen_store::MemoryStore;

const SECRET: &str = "integration-test-secret-0123456789abcdef";

fn disabled<T>(name: &'static str, build: impl FnOnce(ProviderConfig) -> T) -> T {
    build(ProviderConfig::new(
        name,
        "http://127.0.0.1:9",
        AuthScheme::Bearer,
        Credential::Missing,
    ))
}

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        config: ApiConfig::default(),
        users: store.clone(),
        conversations: store.clone(),
        listings: store.clone(),
        subscriptions: store,
        openai: Arc::new(disabled("openai", OpenAiClient::new)),
        fal: Arc::new(disabled("fal", FalClient::new)),
        tts: Arc::new(disabled("elevenlabs", ElevenLabsClient::new)),
        verifier: Arc::new(JwtVerifier::new(SECRET)),
        analysis: Arc::new(KeywordAnalysis),
    };
    create_router(state, None)
}

fn token_for(uid: &str) -> String {
    let claims = Claims {
        sub: uid.to_string(),
        email: Some(format!("{}@example.com", uid)),
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: Some(chrono::Utc::now().timestamp()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn authed(method: &str, uri: &str, uid: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token_for(uid)))
        .header("content-type", "application/json");
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_token_yields_401_envelope() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/chat/conversations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["errorType"], "UNAUTHORIZED");
    assert!(body["requestId"].as_str().is_some());
}

#[tokio::test]
async fn chat_flow_falls_back_when_provider_disabled() {
    let app = test_app();

    // Create a conversation.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/chat/conversations",
            "user-1",
            Some(json!({"title": "My chat"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let conversation_id = body["data"]["conversation"]["id"].as_str().unwrap().to_string();

    // Send a message; the disabled provider routes to the stub.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/chat/conversations/{}/messages", conversation_id),
            "user-1",
            Some(json!({"content": "I love this app"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["message"]["fallback"], json!(true));
    assert_eq!(body["data"]["message"]["role"], "assistant");

    // Both the user message and the reply are stored.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/chat/conversations/{}/messages", conversation_id),
            "user-1",
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["messages"].as_array().unwrap().len(), 2);

    // Another user cannot see the conversation.
    let response = app
        .oneshot(authed(
            "GET",
            &format!("/api/chat/conversations/{}", conversation_id),
            "user-2",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/chat/conversations",
            "user-1",
            Some(json!({})),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let conversation_id = body["data"]["conversation"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(authed(
            "POST",
            &format!("/api/chat/conversations/{}/messages", conversation_id),
            "user-1",
            Some(json!({"content": "   "})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["errorType"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn disabled_tts_returns_service_disabled() {
    let app = test_app();

    let response = app
        .oneshot(authed(
            "POST",
            "/api/tts",
            "user-1",
            Some(json!({"text": "Hello world"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["errorType"], "SERVICE_DISABLED");
}

#[tokio::test]
async fn provider_status_reports_disabled_clients() {
    let app = test_app();

    let response = app
        .oneshot(authed("GET", "/api/providers/status", "user-1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let providers = body["data"]["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 3);
    for provider in providers {
        assert_eq!(provider["enabled"], json!(false));
        assert_eq!(provider["state"], "missing_api_key");
        assert_eq!(provider["errorType"], "MISSING_API_KEY");
    }
}

#[tokio::test]
async fn marketplace_crud_enforces_ownership() {
    let app = test_app();

    // Seller creates a listing.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/market/listings",
            "seller-1",
            Some(json!({
                "title": "Storyteller persona",
                "description": "A warm narrator",
                "category": "persona",
                "price_cents": 499,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listing_id = body["data"]["listing"]["id"].as_str().unwrap().to_string();

    // Anyone authenticated can browse it.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/market/listings?category=persona&sort=price_asc",
            "buyer-1",
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], json!(1));

    // A non-owner cannot modify it.
    let response = app
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/market/listings/{}", listing_id),
            "buyer-1",
            Some(json!({"price_cents": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can.
    let response = app
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/market/listings/{}", listing_id),
            "seller-1",
            Some(json!({"price_cents": 999})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["listing"]["price_cents"], json!(999));

    // And delete it.
    let response = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/market/listings/{}", listing_id),
            "seller-1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed(
            "GET",
            &format!("/api/market/listings/{}", listing_id),
            "seller-1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_listing_category_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(authed(
            "POST",
            "/api/market/listings",
            "seller-1",
            Some(json!({
                "title": "Mystery box",
                "category": "sticker_pack",
                "price_cents": 100,
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["errorType"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn subscription_lifecycle() {
    let app = test_app();

    // Catalog is available.
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/subscriptions/plans", "user-1", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["plans"].as_array().unwrap().len(), 3);

    // No subscription yet.
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/subscriptions/current", "user-1", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"]["subscription"].is_null());

    // Subscribe.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/subscriptions/subscribe",
            "user-1",
            Some(json!({"plan_id": "plus"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["subscription"]["status"], "active");

    // Unknown plan is a validation error.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/subscriptions/subscribe",
            "user-1",
            Some(json!({"plan_id": "enterprise"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Cancel.
    let response = app
        .clone()
        .oneshot(authed("POST", "/api/subscriptions/cancel", "user-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["subscription"]["status"], "canceled");

    // Cancelling again conflicts.
    let response = app
        .oneshot(authed("POST", "/api/subscriptions/cancel", "user-1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
