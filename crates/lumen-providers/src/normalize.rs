//! Request normalization helpers.
//!
//! All validation here runs before any network call; a rejected request
//! never reaches the transport.

use crate::error::{ProviderError, ProviderResult};

/// Trim a required free-text field and bound its length.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> ProviderResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if trimmed.chars().count() > max_chars {
        return Err(ProviderError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max_chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an enumerated field against its allowed set.
pub fn enumerated(field: &str, value: &str, allowed: &[&str]) -> ProviderResult<String> {
    let trimmed = value.trim();
    if allowed.contains(&trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ProviderError::Validation(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        )))
    }
}

/// Normalize a tuning parameter that callers express as either 0–1 or
/// 0–100. A magnitude above 1 implies percentage scale; the result is
/// always clamped into [0.0, 1.0].
pub fn unit_interval(value: f64) -> f64 {
    let scaled = if value > 1.0 { value / 100.0 } else { value };
    scaled.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("text", "  hello  ", 10).unwrap(), "hello");
    }

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(required_text("text", "", 10).is_err());
        assert!(required_text("text", "   ", 10).is_err());
    }

    #[test]
    fn test_required_text_rejects_overlong() {
        let err = required_text("text", "abcdef", 5).unwrap_err();
        assert_eq!(err.error_type(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_enumerated() {
        assert_eq!(
            enumerated("aspect_ratio", "16:9", &["16:9", "9:16"]).unwrap(),
            "16:9"
        );
        assert!(enumerated("aspect_ratio", "21:9", &["16:9", "9:16"]).is_err());
    }

    #[test]
    fn test_unit_interval_passthrough() {
        assert_eq!(unit_interval(0.0), 0.0);
        assert_eq!(unit_interval(0.5), 0.5);
        assert_eq!(unit_interval(1.0), 1.0);
    }

    #[test]
    fn test_unit_interval_percentage_scale() {
        assert_eq!(unit_interval(75.0), 0.75);
        assert_eq!(unit_interval(100.0), 1.0);
        // Over 100% still clamps to 1.
        assert_eq!(unit_interval(150.0), 1.0);
        // 1 < v <= 100 divides first, then clamps.
        assert_eq!(unit_interval(2.0), 0.02);
    }

    #[test]
    fn test_unit_interval_clamps_negative() {
        assert_eq!(unit_interval(-0.3), 0.0);
    }
}
