//! Generation API handlers: image, video, and text-to-speech.
//!
//! Handlers are thin: the provider frontends own payload validation and
//! normalization, so a bad request is rejected before any outbound call.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use lumen_models::ServiceEnvelope;
use lumen_providers::{ImageRequest, TtsRequest, VideoRequest};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// Image generation request body.
#[derive(Debug, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub num_images: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Generate images via Fal.ai.
pub async fn generate_image(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<ImageGenerationRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    let result = state
        .fal
        .generate_image(&ImageRequest {
            prompt: request.prompt,
            aspect_ratio: request.aspect_ratio,
            num_images: request.num_images,
            seed: request.seed,
        })
        .await;
    metrics::record_provider_call("fal", if result.is_ok() { "ok" } else { "error" });

    Ok(Json(ServiceEnvelope::success(result?.to_data())))
}

/// Video generation request body.
#[derive(Debug, Deserialize)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

/// Generate a short video clip via Fal.ai.
pub async fn generate_video(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<VideoGenerationRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    let result = state
        .fal
        .generate_video(&VideoRequest {
            prompt: request.prompt,
            aspect_ratio: request.aspect_ratio,
            duration_seconds: request.duration_seconds,
        })
        .await;
    metrics::record_provider_call("fal", if result.is_ok() { "ok" } else { "error" });

    Ok(Json(ServiceEnvelope::success(result?.to_data())))
}

/// Text-to-speech request body.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    /// Accepted as 0–1 or 0–100.
    #[serde(default)]
    pub stability: Option<f64>,
    /// Accepted as 0–1 or 0–100.
    #[serde(default)]
    pub similarity_boost: Option<f64>,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Synthesize speech via ElevenLabs. The envelope carries the audio
/// base64-encoded under `audioData`.
pub async fn synthesize_speech(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<SpeechRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    let result = state
        .tts
        .synthesize(&TtsRequest {
            text: request.text,
            voice_id: request.voice_id,
            model_id: request.model_id,
            stability: request.stability,
            similarity_boost: request.similarity_boost,
            output_format: request.output_format,
        })
        .await;
    metrics::record_provider_call("elevenlabs", if result.is_ok() { "ok" } else { "error" });

    Ok(Json(ServiceEnvelope::success(result?.to_data())))
}

/// List available voices from ElevenLabs.
pub async fn list_voices(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let voices = state.tts.voices().await?;
    let voices: Vec<_> = voices
        .into_iter()
        .map(|v| {
            json!({
                "voiceId": v.voice_id,
                "name": v.name,
                "category": v.category,
            })
        })
        .collect();

    Ok(Json(ServiceEnvelope::success(json!({"voices": voices}))))
}
