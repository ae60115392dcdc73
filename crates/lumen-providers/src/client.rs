//! Generic provider HTTP client.
//!
//! One instance per provider, parameterized by base URL, auth-header
//! scheme, and timeouts. Each logical operation issues one outbound call
//! and retries at most once, only on transport errors or 5xx, after a
//! fixed delay. 4xx responses are returned to the caller immediately.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{AuthScheme, ProviderConfig};
use crate::credential::Credential;
use crate::error::{ProviderError, ProviderResult};

/// Fixed pause before the single retry.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Maximum retries per call. Worst-case latency is therefore bounded by
/// 2×timeout + RETRY_DELAY.
const MAX_RETRIES: u32 = 1;

/// Raw response from a provider, consumed immediately by the caller.
#[derive(Debug)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl ProviderResponse {
    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ProviderError::Unknown(format!("invalid provider response: {}", e)))
    }
}

/// HTTP client for one external provider.
pub struct ProviderClient {
    http: Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Create a client. Never fails: an invalid credential leaves the
    /// client disabled and is logged once here.
    pub fn new(config: ProviderConfig) -> Self {
        if !config.credential.is_valid() {
            warn!(
                provider = config.name,
                state = config.credential.state(),
                "Provider credential not usable; client disabled"
            );
        }
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn is_enabled(&self) -> bool {
        self.config.credential.is_valid()
    }

    pub fn credential(&self) -> &Credential {
        &self.config.credential
    }

    /// Classification of an unusable credential, if any.
    pub fn credential_error(&self) -> Option<ProviderError> {
        self.config.credential.error_for(self.config.name)
    }

    /// POST a JSON payload to a provider path.
    pub async fn post_json(&self, path: &str, payload: &Value) -> ProviderResult<ProviderResponse> {
        self.request(Method::POST, path, Some(payload), self.config.request_timeout)
            .await
    }

    /// GET a provider path.
    pub async fn get(&self, path: &str) -> ProviderResult<ProviderResponse> {
        self.request(Method::GET, path, None, self.config.request_timeout)
            .await
    }

    /// Health probe: short timeout, single attempt, never errors.
    pub async fn probe(&self, path: &str) -> bool {
        let secret = match self.config.credential.secret() {
            Some(secret) => secret.to_string(),
            None => return false,
        };

        match self
            .execute(Method::GET, path, None, &secret, self.config.health_timeout)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(provider = self.config.name, error = %e, "Health probe failed");
                false
            }
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        timeout: Duration,
    ) -> ProviderResult<ProviderResponse> {
        let secret = match self.config.credential.secret() {
            Some(secret) => secret.to_string(),
            None => return Err(ProviderError::Disabled(self.config.name.to_string())),
        };

        let mut attempt = 0u32;
        loop {
            match self
                .execute(method.clone(), path, payload, &secret, timeout)
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    attempt += 1;
                    warn!(
                        provider = self.config.name,
                        path,
                        attempt,
                        error = %e,
                        "Provider call failed, retrying in {:?}",
                        RETRY_DELAY
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One transport attempt: apply auth header, send, read the body,
    /// classify non-2xx statuses.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        secret: &str,
        timeout: Duration,
    ) -> ProviderResult<ProviderResponse> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(provider = self.config.name, %url, "Provider request");

        let mut builder = self.http.request(method, &url).timeout(timeout);
        builder = match self.config.auth {
            AuthScheme::Bearer => builder.header(AUTHORIZATION, format!("Bearer {}", secret)),
            AuthScheme::Key => builder.header(AUTHORIZATION, format!("Key {}", secret)),
            AuthScheme::XiApiKey => builder.header("xi-api-key", secret),
        };
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(ProviderError::from_transport)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .bytes()
            .await
            .map_err(ProviderError::from_transport)?
            .to_vec();

        if status >= 400 {
            return Err(ProviderError::from_status(
                status,
                &String::from_utf8_lossy(&body),
            ));
        }

        Ok(ProviderResponse {
            status,
            body,
            content_type,
        })
    }
}
