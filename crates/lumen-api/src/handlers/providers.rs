//! Provider status handler.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use lumen_models::ServiceEnvelope;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

fn provider_entry(
    name: &str,
    enabled: bool,
    state: &'static str,
    error: Option<lumen_providers::ProviderError>,
) -> Value {
    let mut entry = json!({
        "name": name,
        "enabled": enabled,
        "state": state,
    });
    if let Some(error) = error {
        entry["errorType"] = json!(error.error_type());
    }
    entry
}

/// Report credential state per provider. Never exposes key material,
/// only the validated state tag and its classification.
pub async fn provider_status(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let providers = json!([
        provider_entry(
            "openai",
            state.openai.is_enabled(),
            state.openai.credential_state(),
            state.openai.credential_error(),
        ),
        provider_entry(
            "fal",
            state.fal.is_enabled(),
            state.fal.credential_state(),
            state.fal.credential_error(),
        ),
        provider_entry(
            "elevenlabs",
            state.tts.is_enabled(),
            state.tts.credential_state(),
            state.tts.credential_error(),
        ),
    ]);

    Ok(Json(ServiceEnvelope::success(json!({
        "providers": providers
    }))))
}
