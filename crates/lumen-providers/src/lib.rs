//! HTTP clients for external AI providers.
//!
//! One generic transport (`ProviderClient`) parameterized by base URL,
//! auth-header scheme, and timeouts, shared by thin per-provider
//! frontends:
//! - OpenAI chat completions
//! - Fal.ai image/video generation
//! - ElevenLabs text-to-speech
//!
//! Each frontend normalizes caller input before any network call,
//! classifies failures into a fixed error table, and reshapes provider
//! responses for the service envelope. A provider with a missing or
//! malformed credential is disabled at construction; its operations fail
//! locally without touching the network.

pub mod client;
pub mod config;
pub mod credential;
pub mod elevenlabs;
pub mod error;
pub mod fal;
pub mod normalize;
pub mod openai;

pub use client::{ProviderClient, ProviderResponse};
pub use config::{AuthScheme, ProviderConfig, GENERATION_TIMEOUT, HEALTH_PROBE_TIMEOUT};
pub use credential::Credential;
pub use elevenlabs::{ElevenLabsClient, TtsReply, TtsRequest};
pub use error::{ErrorClassification, ProviderError, ProviderResult};
pub use fal::{FalClient, ImageReply, ImageRequest, VideoReply, VideoRequest};
pub use openai::{ChatReply, ChatRequest, ChatTurn, OpenAiClient};
