//! Subscription API handlers.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use lumen_models::ServiceEnvelope;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// List the plan catalog.
pub async fn list_plans(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let plans = state.subscriptions.plans().await?;
    Ok(Json(ServiceEnvelope::success(json!({"plans": plans}))))
}

/// Current subscription with its plan, if any.
pub async fn current_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let subscription = state.subscriptions.current(&user.uid).await?;
    let plan = match &subscription {
        Some(sub) => state.subscriptions.plan(&sub.plan_id).await?,
        None => None,
    };

    Ok(Json(ServiceEnvelope::success(json!({
        "subscription": subscription,
        "plan": plan,
    }))))
}

/// Subscribe request.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: String,
}

/// Subscribe the user to a plan.
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    state
        .users
        .get_or_create(&user.uid, user.email.as_deref())
        .await?;

    let subscription = state
        .subscriptions
        .subscribe(&user.uid, request.plan_id.trim())
        .await?;
    info!(user_id = %user.uid, plan_id = %subscription.plan_id, "User subscribed");

    Ok(Json(ServiceEnvelope::success(json!({
        "subscription": subscription
    }))))
}

/// Cancel the user's active subscription.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let subscription = state.subscriptions.cancel(&user.uid).await?;
    info!(user_id = %user.uid, "Subscription canceled");

    Ok(Json(ServiceEnvelope::success(json!({
        "subscription": subscription
    }))))
}
