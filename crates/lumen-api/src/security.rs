//! Input sanitization utilities.

/// Maximum chat message length accepted from callers.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Maximum title length.
pub const MAX_TITLE_LENGTH: usize = 120;

/// Sanitize a user-provided string for safe logging and storage.
///
/// Strips control characters (keeping newlines and tabs) and caps the
/// length.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_len)
        .collect()
}

/// Sanitize a title: trimmed, single-line, length-bounded.
pub fn sanitize_title(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TITLE_LENGTH)
        .collect()
}

/// Validate a record id: UUID-shaped, no path metacharacters.
pub fn is_valid_id(id: &str) -> bool {
    if id.is_empty() || id.len() > 64 {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text_strips_control_chars() {
        assert_eq!(sanitize_text("a\u{0000}b\nc", 10), "ab\nc");
    }

    #[test]
    fn test_sanitize_text_caps_length() {
        assert_eq!(sanitize_text("abcdef", 3), "abc");
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("  My chat\n "), "My chat");
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has/slash"));
        assert!(!is_valid_id("has..dots"));
    }
}
