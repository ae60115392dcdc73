//! Provider credential guard.
//!
//! A credential is read once at client construction and never revalidated.
//! A client whose credential is not `Valid` is disabled: its operations
//! fail locally with `SERVICE_DISABLED` and never reach the network.
//! Construction itself never fails: a missing third-party key must not
//! prevent the rest of the service from starting.

use std::fmt;

use crate::error::ProviderError;

/// Validated state of a provider API key.
#[derive(Clone)]
pub enum Credential {
    /// The environment variable was absent or empty.
    Missing,
    /// Present but shorter than the provider's minimum key length.
    Malformed,
    Valid(String),
}

impl Credential {
    /// Read a credential from the environment.
    pub fn from_env(var: &str, min_len: usize) -> Self {
        match std::env::var(var) {
            Ok(value) => Self::from_value(&value, min_len),
            Err(_) => Credential::Missing,
        }
    }

    /// Validate a raw credential value.
    pub fn from_value(value: &str, min_len: usize) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Credential::Missing
        } else if trimmed.len() < min_len {
            Credential::Malformed
        } else {
            Credential::Valid(trimmed.to_string())
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Credential::Valid(_))
    }

    pub fn secret(&self) -> Option<&str> {
        match self {
            Credential::Valid(secret) => Some(secret),
            _ => None,
        }
    }

    /// State tag for status reporting. Never exposes key material.
    pub fn state(&self) -> &'static str {
        match self {
            Credential::Missing => "missing_api_key",
            Credential::Malformed => "invalid_api_key",
            Credential::Valid(_) => "ready",
        }
    }

    /// The classification an invalid credential produces when checked
    /// explicitly (e.g. from a status endpoint).
    pub fn error_for(&self, provider: &str) -> Option<ProviderError> {
        match self {
            Credential::Missing => Some(ProviderError::MissingApiKey(provider.to_string())),
            Credential::Malformed => Some(ProviderError::InvalidApiKey(format!(
                "{} API key is malformed",
                provider
            ))),
            Credential::Valid(_) => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Missing => write!(f, "Missing"),
            Credential::Malformed => write!(f, "Malformed"),
            Credential::Valid(_) => write!(f, "Valid(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_missing() {
        assert!(matches!(Credential::from_value("", 20), Credential::Missing));
        assert!(matches!(Credential::from_value("   ", 20), Credential::Missing));
    }

    #[test]
    fn test_short_is_malformed() {
        assert!(matches!(
            Credential::from_value("abc123", 20),
            Credential::Malformed
        ));
    }

    #[test]
    fn test_valid_trims_whitespace() {
        let cred = Credential::from_value("  sk-test-0123456789abcdef  ", 20);
        assert_eq!(cred.secret(), Some("sk-test-0123456789abcdef"));
        assert_eq!(cred.state(), "ready");
    }

    #[test]
    fn test_error_classification_per_state() {
        assert_eq!(
            Credential::Missing.error_for("tts").unwrap().error_type(),
            "MISSING_API_KEY"
        );
        assert_eq!(
            Credential::Malformed.error_for("tts").unwrap().error_type(),
            "INVALID_API_KEY"
        );
        assert!(Credential::from_value("sk-test-0123456789abcdef", 20)
            .error_for("tts")
            .is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cred = Credential::from_value("sk-test-0123456789abcdef", 20);
        let rendered = format!("{:?}", cred);
        assert!(!rendered.contains("sk-test"));
    }
}
