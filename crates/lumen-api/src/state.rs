//! Application state.

use std::sync::Arc;

use lumen_providers::{ElevenLabsClient, FalClient, OpenAiClient};
use lumen_store::{ConversationStore, ListingStore, MemoryStore, SubscriptionStore, UserStore};

use crate::auth::JwtVerifier;
use crate::config::ApiConfig;
use crate::services::{AnalysisStub, KeywordAnalysis};

/// Shared application state.
///
/// Store fields are trait objects so the in-memory backing can be
/// swapped; provider clients are constructed once and shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub users: Arc<dyn UserStore>,
    pub conversations: Arc<dyn ConversationStore>,
    pub listings: Arc<dyn ListingStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub openai: Arc<OpenAiClient>,
    pub fal: Arc<FalClient>,
    pub tts: Arc<ElevenLabsClient>,
    pub verifier: Arc<JwtVerifier>,
    pub analysis: Arc<dyn AnalysisStub>,
}

impl AppState {
    /// Create application state from the environment. Provider clients
    /// never fail here; a missing key disables that provider only. The
    /// JWT secret is the one hard requirement.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(JwtVerifier::from_env()?);

        Ok(Self {
            config,
            users: store.clone(),
            conversations: store.clone(),
            listings: store.clone(),
            subscriptions: store,
            openai: Arc::new(OpenAiClient::from_env()),
            fal: Arc::new(FalClient::from_env()),
            tts: Arc::new(ElevenLabsClient::from_env()),
            verifier,
            analysis: Arc::new(KeywordAnalysis),
        })
    }
}
