//! ElevenLabs text-to-speech client.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::ProviderClient;
use crate::config::{AuthScheme, ProviderConfig};
use crate::credential::Credential;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{enumerated, required_text, unit_interval};

pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";
pub const DEFAULT_STABILITY: f64 = 0.5;
pub const DEFAULT_SIMILARITY: f64 = 0.8;
pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

const MAX_TTS_CHARS: usize = 5000;

const ALLOWED_MODELS: &[&str] = &["eleven_multilingual_v2", "eleven_turbo_v2_5"];
const ALLOWED_OUTPUT_FORMATS: &[&str] = &["mp3_44100_128", "mp3_22050_32", "pcm_16000"];

/// Text-to-speech request as accepted from callers.
#[derive(Debug, Clone, Default)]
pub struct TtsRequest {
    pub text: String,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    /// Voice stability, accepted as 0–1 or 0–100.
    pub stability: Option<f64>,
    /// Similarity boost, accepted as 0–1 or 0–100.
    pub similarity_boost: Option<f64>,
    pub output_format: Option<String>,
}

/// Fully normalized synthesis call: endpoint path plus payload.
#[derive(Debug)]
pub struct NormalizedTts {
    pub voice_id: String,
    pub output_format: String,
    pub path: String,
    pub payload: Value,
    pub character_count: usize,
}

impl TtsRequest {
    pub fn normalize(&self) -> ProviderResult<NormalizedTts> {
        let text = required_text("text", &self.text, MAX_TTS_CHARS)?;

        let voice_id = match self.voice_id.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_VOICE_ID.to_string(),
            Some(voice) => {
                if !voice.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(ProviderError::Validation(
                        "voice_id must be alphanumeric".to_string(),
                    ));
                }
                voice.to_string()
            }
        };

        let model_id = match &self.model_id {
            Some(model) => enumerated("model_id", model, ALLOWED_MODELS)?,
            None => DEFAULT_TTS_MODEL.to_string(),
        };
        let output_format = match &self.output_format {
            Some(format) => enumerated("output_format", format, ALLOWED_OUTPUT_FORMATS)?,
            None => DEFAULT_OUTPUT_FORMAT.to_string(),
        };

        let stability = unit_interval(self.stability.unwrap_or(DEFAULT_STABILITY));
        let similarity_boost = unit_interval(self.similarity_boost.unwrap_or(DEFAULT_SIMILARITY));

        let character_count = text.chars().count();
        let payload = json!({
            "text": text,
            "model_id": model_id,
            "voice_settings": {
                "stability": stability,
                "similarity_boost": similarity_boost,
            },
        });

        Ok(NormalizedTts {
            path: format!(
                "/v1/text-to-speech/{}?output_format={}",
                voice_id, output_format
            ),
            voice_id,
            output_format,
            payload,
            character_count,
        })
    }
}

/// Synthesized audio, reshaped for the service envelope.
#[derive(Debug, Clone)]
pub struct TtsReply {
    pub audio: Vec<u8>,
    pub content_type: String,
    pub voice_id: String,
    pub output_format: String,
    pub character_count: usize,
}

impl TtsReply {
    /// Envelope data payload with the audio base64-encoded. Encoding is
    /// loss-less; decoding `audioData` reproduces the original bytes.
    pub fn to_data(&self) -> Value {
        json!({
            "audioData": STANDARD.encode(&self.audio),
            "contentType": self.content_type,
            "voiceId": self.voice_id,
            "outputFormat": self.output_format,
            "characterCount": self.character_count,
        })
    }
}

/// One available voice.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<Voice>,
}

/// Client for the ElevenLabs text-to-speech API.
pub struct ElevenLabsClient {
    client: ProviderClient,
}

impl ElevenLabsClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: ProviderClient::new(config),
        }
    }

    /// Create from environment variables. `ELEVENLABS_BASE_URL` overrides
    /// the default endpoint.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ELEVENLABS_BASE_URL")
            .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string());
        Self::new(ProviderConfig::new(
            "elevenlabs",
            base_url,
            AuthScheme::XiApiKey,
            Credential::from_env("ELEVENLABS_API_KEY", 20),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_enabled()
    }

    pub fn credential_state(&self) -> &'static str {
        self.client.credential().state()
    }

    pub fn credential_error(&self) -> Option<ProviderError> {
        self.client.credential_error()
    }

    /// Synthesize speech. The response body is raw audio.
    pub async fn synthesize(&self, request: &TtsRequest) -> ProviderResult<TtsReply> {
        let normalized = request.normalize()?;
        let response = self
            .client
            .post_json(&normalized.path, &normalized.payload)
            .await?;

        if response.body.is_empty() {
            return Err(ProviderError::Unknown(
                "provider returned empty audio".to_string(),
            ));
        }

        Ok(TtsReply {
            audio: response.body,
            content_type: response
                .content_type
                .unwrap_or_else(|| "audio/mpeg".to_string()),
            voice_id: normalized.voice_id,
            output_format: normalized.output_format,
            character_count: normalized.character_count,
        })
    }

    /// List available voices.
    pub async fn voices(&self) -> ProviderResult<Vec<Voice>> {
        let response = self.client.get("/v1/voices").await?;
        let parsed: VoicesResponse = response.json()?;
        Ok(parsed.voices)
    }

    /// Check provider reachability.
    pub async fn health(&self) -> bool {
        self.client.probe("/v1/user").await
    }
}
