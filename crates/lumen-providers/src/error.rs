//! Provider error types and classification.
//!
//! Every failure, whether from local validation, transport, or provider status, maps
//! deterministically onto a small closed set of kinds. Each kind carries a
//! fixed user-facing message and the HTTP status the service returns for
//! it.

use thiserror::Error;

use lumen_models::ServiceEnvelope;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when talking to an external provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingApiKey(String),

    #[error("API key rejected: {0}")]
    InvalidApiKey(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Payment required: {0}")]
    PaymentRequired(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} is currently disabled")]
    Disabled(String),

    #[error("Unexpected provider error: {0}")]
    Unknown(String),
}

/// Normalized failure: kind tag, fixed user message, outward status.
#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub user_message: &'static str,
    pub http_status: u16,
    pub details: Option<String>,
}

impl ErrorClassification {
    /// Build a failure envelope from this classification.
    pub fn into_envelope(self) -> ServiceEnvelope {
        ServiceEnvelope::failure(self.error_type, self.user_message, self.details)
    }
}

impl ProviderError {
    /// Classify a provider HTTP status code.
    pub fn from_status(status: u16, detail: &str) -> Self {
        let detail = detail.trim().chars().take(500).collect::<String>();
        match status {
            400 => ProviderError::Validation(detail),
            401 => ProviderError::InvalidApiKey(detail),
            402 => ProviderError::PaymentRequired(detail),
            403 => ProviderError::AccessDenied(detail),
            429 => ProviderError::RateLimited(detail),
            s if s >= 500 => ProviderError::Server { status: s, detail },
            s => ProviderError::Unknown(format!("unhandled status {}: {}", s, detail)),
        }
    }

    /// Classify a transport-level failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::Network(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ProviderError::Unknown(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }

    /// Transient failures eligible for the single retry: network-level
    /// errors and 5xx. Client errors (4xx) are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout | ProviderError::Network(_) | ProviderError::Server { .. }
        )
    }

    /// Stable kind tag surfaced as `errorType` in the envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey(_) => "MISSING_API_KEY",
            ProviderError::InvalidApiKey(_) => "INVALID_API_KEY",
            ProviderError::AccessDenied(_) => "ACCESS_DENIED",
            ProviderError::PaymentRequired(_) => "PAYMENT_REQUIRED",
            ProviderError::RateLimited(_) => "RATE_LIMITED",
            ProviderError::Timeout => "TIMEOUT",
            ProviderError::Network(_) => "NETWORK_ERROR",
            ProviderError::Server { .. } => "SERVER_ERROR",
            ProviderError::Validation(_) => "VALIDATION_ERROR",
            ProviderError::Disabled(_) => "SERVICE_DISABLED",
            ProviderError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Fixed, provider-agnostic user-facing message for the kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey(_) => "This feature is not configured on the server.",
            ProviderError::InvalidApiKey(_) => "The server's provider credentials were rejected.",
            ProviderError::AccessDenied(_) => "Access to the provider was denied.",
            ProviderError::PaymentRequired(_) => {
                "The provider account is out of credits."
            }
            ProviderError::RateLimited(_) => "Too many requests. Please try again shortly.",
            ProviderError::Timeout => "The provider took too long to respond.",
            ProviderError::Network(_) => "Could not reach the provider.",
            ProviderError::Server { .. } => "The provider had an internal error.",
            ProviderError::Validation(_) => "The request was invalid.",
            ProviderError::Disabled(_) => "This feature is currently unavailable.",
            ProviderError::Unknown(_) => "An unexpected error occurred.",
        }
    }

    /// HTTP status the service returns for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            ProviderError::MissingApiKey(_) => 500,
            ProviderError::InvalidApiKey(_) => 500,
            ProviderError::AccessDenied(_) => 403,
            ProviderError::PaymentRequired(_) => 402,
            ProviderError::RateLimited(_) => 429,
            ProviderError::Timeout => 503,
            ProviderError::Network(_) => 503,
            ProviderError::Server { .. } => 503,
            ProviderError::Validation(_) => 400,
            ProviderError::Disabled(_) => 503,
            ProviderError::Unknown(_) => 500,
        }
    }

    /// Full classification tuple for this error.
    pub fn classification(&self) -> ErrorClassification {
        ErrorClassification {
            error_type: self.error_type(),
            user_message: self.user_message(),
            http_status: self.http_status(),
            details: Some(self.to_string()),
        }
    }
}
