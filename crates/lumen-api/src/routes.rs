//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::chat::{
    create_conversation, delete_conversation, get_conversation, list_conversations, list_messages,
    send_message,
};
use crate::handlers::generate::{generate_image, generate_video, list_voices, synthesize_speech};
use crate::handlers::health::{health, ready};
use crate::handlers::market::{
    create_listing, delete_listing, get_listing, list_listings, update_listing,
};
use crate::handlers::providers::provider_status;
use crate::handlers::subscriptions::{
    cancel_subscription, current_subscription, list_plans, subscribe,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let chat_routes = Router::new()
        .route(
            "/chat/conversations",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/chat/conversations/:conversation_id",
            get(get_conversation).delete(delete_conversation),
        )
        .route(
            "/chat/conversations/:conversation_id/messages",
            post(send_message).get(list_messages),
        );

    let generation_routes = Router::new()
        .route("/generate/image", post(generate_image))
        .route("/generate/video", post(generate_video))
        .route("/tts", post(synthesize_speech))
        .route("/tts/voices", get(list_voices));

    let market_routes = Router::new()
        .route("/market/listings", post(create_listing).get(list_listings))
        .route(
            "/market/listings/:listing_id",
            get(get_listing).patch(update_listing).delete(delete_listing),
        );

    let subscription_routes = Router::new()
        .route("/subscriptions/plans", get(list_plans))
        .route("/subscriptions/current", get(current_subscription))
        .route("/subscriptions/subscribe", post(subscribe))
        .route("/subscriptions/cancel", post(cancel_subscription));

    let provider_routes = Router::new().route("/providers/status", get(provider_status));

    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(chat_routes)
        .merge(generation_routes)
        .merge(market_routes)
        .merge(subscription_routes)
        .merge(provider_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
