//! Uniform response envelope.
//!
//! Every endpoint returns exactly one envelope per inbound call:
//! `{success, data | error, requestId, timestamp}`. The timestamp is
//! RFC3339 and the request id is a fresh UUID v4.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Outward-facing result wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEnvelope {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,

    pub request_id: String,

    /// RFC3339 timestamp of envelope construction.
    pub timestamp: String,
}

/// Error payload inside a failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeError {
    /// Stable error kind tag, e.g. `RATE_LIMITED`.
    pub error_type: String,
    /// Fixed user-facing message for the kind.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServiceEnvelope {
    /// Wrap a successful payload. The data value is passed through
    /// unchanged; only `requestId` and `timestamp` vary between calls.
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Wrap a failure classification.
    pub fn failure(
        error_type: impl Into<String>,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(EnvelopeError {
                error_type: error_type.into(),
                message: message.into(),
                details,
            }),
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let env = ServiceEnvelope::success(json!({"value": 1}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["value"], json!(1));
        assert!(v.get("error").is_none());
        assert!(v["requestId"].as_str().is_some());
        assert!(v["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let env = ServiceEnvelope::failure("RATE_LIMITED", "Too many requests", None);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"]["errorType"], json!("RATE_LIMITED"));
        assert!(v.get("data").is_none());
    }

    #[test]
    fn test_data_is_stable_across_envelopes() {
        let data = json!({"audio": "aGVsbG8=", "format": "mp3"});
        let a = ServiceEnvelope::success(data.clone());
        let b = ServiceEnvelope::success(data);
        // Same data payload, different request identity.
        assert_eq!(a.data, b.data);
        assert_ne!(a.request_id, b.request_id);
    }
}
