//! Conversation and chat message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat conversation owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation with a fresh id.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            "system" => Some(MessageRole::System),
            _ => None,
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,

    /// Model that produced an assistant message, when one did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// True when the reply came from the local fallback stub rather
    /// than a provider.
    #[serde(default)]
    pub fallback: bool,

    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user-authored message.
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            role: MessageRole::User,
            content: content.into(),
            model: None,
            fallback: false,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message produced by a provider model.
    pub fn assistant(
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            model: Some(model.into()),
            fallback: false,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message from the fallback stub.
    pub fn fallback(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            model: None,
            fallback: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            assert_eq!(MessageRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(MessageRole::from_str("bot"), None);
    }

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::user("c1", "hello");
        assert_eq!(msg.role, MessageRole::User);
        assert!(!msg.fallback);

        let reply = ChatMessage::fallback("c1", "hi there");
        assert_eq!(reply.role, MessageRole::Assistant);
        assert!(reply.fallback);
        assert!(reply.model.is_none());
    }
}
