//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub providers: ProviderChecks,
}

#[derive(Serialize)]
pub struct ProviderChecks {
    pub openai: CheckStatus,
    pub fal: CheckStatus,
    pub elevenlabs: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CheckStatus {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok".to_string(),
            latency_ms: Some(latency_ms),
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled".to_string(),
            latency_ms: None,
        }
    }

    fn unreachable() -> Self {
        Self {
            status: "unreachable".to_string(),
            latency_ms: None,
        }
    }
}

async fn probe<F, Fut>(enabled: bool, probe: F) -> CheckStatus
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    if !enabled {
        return CheckStatus::disabled();
    }
    let start = std::time::Instant::now();
    if probe().await {
        CheckStatus::ok(start.elapsed().as_millis() as u64)
    } else {
        CheckStatus::unreachable()
    }
}

/// Readiness check endpoint. Probes each enabled provider; an
/// unreachable or disabled provider degrades that feature only, so this
/// always answers 200; the `status` field says whether anything is
/// degraded.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let (openai, fal, elevenlabs) = tokio::join!(
        probe(state.openai.is_enabled(), || async { state.openai.health().await }),
        probe(state.fal.is_enabled(), || async { state.fal.health().await }),
        probe(state.tts.is_enabled(), || async { state.tts.health().await }),
    );

    let degraded = [&openai, &fal, &elevenlabs]
        .iter()
        .any(|c| c.status == "unreachable");

    Json(ReadinessResponse {
        status: if degraded { "degraded" } else { "ready" }.to_string(),
        providers: ProviderChecks {
            openai,
            fal,
            elevenlabs,
        },
    })
}
