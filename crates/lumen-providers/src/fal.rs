//! Fal.ai image and video generation client.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::ProviderClient;
use crate::config::{AuthScheme, ProviderConfig};
use crate::credential::Credential;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{enumerated, required_text};

pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
pub const DEFAULT_VIDEO_SECONDS: u32 = 5;

const IMAGE_MODEL: &str = "fal-ai/flux/schnell";
const VIDEO_MODEL: &str = "fal-ai/ltx-video";
const MAX_PROMPT_CHARS: usize = 2000;
const MAX_VIDEO_SECONDS: u32 = 10;
const MAX_IMAGES: u32 = 4;

const ALLOWED_ASPECTS: &[&str] = &["1:1", "16:9", "9:16", "4:3", "3:4"];

/// Image generation request.
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: Option<String>,
    pub num_images: Option<u32>,
    pub seed: Option<u64>,
}

impl ImageRequest {
    pub fn normalize(&self) -> ProviderResult<Value> {
        let prompt = required_text("prompt", &self.prompt, MAX_PROMPT_CHARS)?;
        let aspect_ratio = match &self.aspect_ratio {
            Some(aspect) => enumerated("aspect_ratio", aspect, ALLOWED_ASPECTS)?,
            None => DEFAULT_ASPECT_RATIO.to_string(),
        };
        let num_images = self.num_images.unwrap_or(1).clamp(1, MAX_IMAGES);

        let mut payload = json!({
            "prompt": prompt,
            "aspect_ratio": aspect_ratio,
            "num_images": num_images,
        });
        if let Some(seed) = self.seed {
            payload["seed"] = json!(seed);
        }
        Ok(payload)
    }
}

/// Video generation request.
#[derive(Debug, Clone, Default)]
pub struct VideoRequest {
    pub prompt: String,
    pub aspect_ratio: Option<String>,
    pub duration_seconds: Option<u32>,
}

impl VideoRequest {
    pub fn normalize(&self) -> ProviderResult<Value> {
        let prompt = required_text("prompt", &self.prompt, MAX_PROMPT_CHARS)?;
        let aspect_ratio = match &self.aspect_ratio {
            Some(aspect) => enumerated("aspect_ratio", aspect, ALLOWED_ASPECTS)?,
            None => DEFAULT_ASPECT_RATIO.to_string(),
        };
        let duration = self
            .duration_seconds
            .unwrap_or(DEFAULT_VIDEO_SECONDS)
            .clamp(1, MAX_VIDEO_SECONDS);

        Ok(json!({
            "prompt": prompt,
            "aspect_ratio": aspect_ratio,
            "duration_seconds": duration,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    images: Vec<ImageAsset>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ImageAsset {
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    video: VideoAsset,
}

#[derive(Debug, Deserialize)]
struct VideoAsset {
    url: String,
}

/// Generated image set, reshaped for the service envelope.
#[derive(Debug, Clone)]
pub struct ImageReply {
    pub urls: Vec<(String, Option<u32>, Option<u32>)>,
    pub seed: Option<u64>,
}

impl ImageReply {
    pub fn to_data(&self) -> Value {
        let images: Vec<Value> = self
            .urls
            .iter()
            .map(|(url, width, height)| {
                json!({"url": url, "width": width, "height": height})
            })
            .collect();
        json!({
            "images": images,
            "seed": self.seed,
            "model": IMAGE_MODEL,
        })
    }
}

/// Generated video, reshaped for the service envelope.
#[derive(Debug, Clone)]
pub struct VideoReply {
    pub url: String,
    pub aspect_ratio: String,
    pub duration_seconds: u32,
}

impl VideoReply {
    pub fn to_data(&self) -> Value {
        json!({
            "videoUrl": self.url,
            "aspectRatio": self.aspect_ratio,
            "durationSeconds": self.duration_seconds,
            "model": VIDEO_MODEL,
        })
    }
}

/// Client for the Fal.ai generation API.
pub struct FalClient {
    client: ProviderClient,
}

impl FalClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: ProviderClient::new(config),
        }
    }

    /// Create from environment variables. `FAL_BASE_URL` overrides the
    /// default endpoint.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FAL_BASE_URL").unwrap_or_else(|_| "https://fal.run".to_string());
        Self::new(ProviderConfig::new(
            "fal",
            base_url,
            AuthScheme::Key,
            Credential::from_env("FAL_API_KEY", 20),
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

    /// Generate one or more images.
    pub async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<ImageReply> {
        let payload = request.normalize()?;
        let response = self
            .client
            .post_json(&format!("/{}", IMAGE_MODEL), &payload)
            .await?;
        let parsed: ImageResponse = response.json()?;

        if parsed.images.is_empty() {
            return Err(ProviderError::Unknown(
                "provider returned no images".to_string(),
            ));
        }

        Ok(ImageReply {
            urls: parsed
                .images
                .into_iter()
                .map(|a| (a.url, a.width, a.height))
                .collect(),
            seed: parsed.seed,
        })
    }

    /// Generate a short video clip.
    pub async fn generate_video(&self, request: &VideoRequest) -> ProviderResult<VideoReply> {
        let payload = request.normalize()?;
        let aspect_ratio = payload["aspect_ratio"]
            .as_str()
            .unwrap_or(DEFAULT_ASPECT_RATIO)
            .to_string();
        let duration_seconds =
            payload["duration_seconds"].as_u64().unwrap_or(u64::from(DEFAULT_VIDEO_SECONDS)) as u32;

        let response = self
            .client
            .post_json(&format!("/{}", VIDEO_MODEL), &payload)
            .await?;
        let parsed: VideoResponse = response.json()?;

        Ok(VideoReply {
            url: parsed.video.url,
            aspect_ratio,
            duration_seconds,
        })
    }

    /// Check provider reachability.
    pub async fn health(&self) -> bool {
        self.client.probe("/health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_defaults() {
        let request = ImageRequest {
            prompt: "a lighthouse at dusk".to_string(),
            ..Default::default()
        };
        let payload = request.normalize().unwrap();
        assert_eq!(payload["aspect_ratio"], DEFAULT_ASPECT_RATIO);
        assert_eq!(payload["num_images"], 1);
        assert!(payload.get("seed").is_none());
    }

    #[test]
    fn test_image_rejects_bad_aspect() {
        let request = ImageRequest {
            prompt: "a lighthouse".to_string(),
            aspect_ratio: Some("21:9".to_string()),
            ..Default::default()
        };
        assert!(request.normalize().is_err());
    }

    #[test]
    fn test_video_duration_clamped() {
        let request = VideoRequest {
            prompt: "waves".to_string(),
            duration_seconds: Some(120),
            ..Default::default()
        };
        let payload = request.normalize().unwrap();
        assert_eq!(payload["duration_seconds"], MAX_VIDEO_SECONDS);
    }

    #[test]
    fn test_num_images_clamped() {
        let request = ImageRequest {
            prompt: "a lighthouse".to_string(),
            num_images: Some(99),
            ..Default::default()
        };
        let payload = request.normalize().unwrap();
        assert_eq!(payload["num_images"], MAX_IMAGES);
    }
}
