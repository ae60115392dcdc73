//! Provider client configuration.

use std::time::Duration;

use crate::credential::Credential;

/// Timeout for generation-class calls.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for health probes.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How the provider expects its API key. These differ per provider and
/// are not unifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `Authorization: Key <key>`
    Key,
    /// `xi-api-key: <key>`
    XiApiKey,
}

/// Configuration for one provider client instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Short provider name used in logs and status reporting.
    pub name: &'static str,
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub auth: AuthScheme,
    pub credential: Credential,
    /// Per-call timeout for generation requests.
    pub request_timeout: Duration,
    /// Per-call timeout for health probes.
    pub health_timeout: Duration,
}

impl ProviderConfig {
    pub fn new(
        name: &'static str,
        base_url: impl Into<String>,
        auth: AuthScheme,
        credential: Credential,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            name,
            base_url,
            auth,
            credential,
            request_timeout: GENERATION_TIMEOUT,
            health_timeout: HEALTH_PROBE_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = ProviderConfig::new(
            "test",
            "https://api.example.com/",
            AuthScheme::Bearer,
            Credential::Missing,
        );
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.request_timeout, GENERATION_TIMEOUT);
        assert_eq!(config.health_timeout, HEALTH_PROBE_TIMEOUT);
    }
}
