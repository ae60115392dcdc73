//! OpenAI chat completion client.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::ProviderClient;
use crate::config::{AuthScheme, ProviderConfig};
use crate::credential::Credential;
use crate::error::{ProviderError, ProviderResult};
use crate::normalize::{enumerated, required_text};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

const MAX_MESSAGE_CHARS: usize = 4000;
const MAX_COMPLETION_TOKENS: u32 = 4096;
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

const ALLOWED_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"];
const ALLOWED_ROLES: &[&str] = &["system", "user", "assistant"];

/// One turn of conversation history sent to the provider.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Caller-facing chat completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub model: Option<String>,
    /// Sampling temperature, clamped into [0, 2].
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build the provider payload. Fails fast on invalid input; nothing
    /// is sent for a request that does not normalize.
    pub fn normalize(&self) -> ProviderResult<Value> {
        if self.messages.is_empty() {
            return Err(ProviderError::Validation(
                "messages must not be empty".to_string(),
            ));
        }

        let mut messages = Vec::with_capacity(self.messages.len());
        for turn in &self.messages {
            let role = enumerated("role", &turn.role, ALLOWED_ROLES)?;
            let content = required_text("message content", &turn.content, MAX_MESSAGE_CHARS)?;
            messages.push(json!({"role": role, "content": content}));
        }

        let model = match &self.model {
            Some(model) => enumerated("model", model, ALLOWED_MODELS)?,
            None => DEFAULT_CHAT_MODEL.to_string(),
        };
        let temperature = self
            .temperature
            .unwrap_or(DEFAULT_TEMPERATURE)
            .clamp(0.0, 2.0);
        let max_tokens = self
            .max_tokens
            .unwrap_or(DEFAULT_MAX_TOKENS)
            .min(MAX_COMPLETION_TOKENS);

        Ok(json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Completed chat reply, reshaped for the service envelope.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatReply {
    /// Envelope data payload. Stable for a fixed provider response.
    pub fn to_data(&self) -> Value {
        json!({
            "reply": self.content,
            "model": self.model,
            "usage": {
                "promptTokens": self.prompt_tokens,
                "completionTokens": self.completion_tokens,
            },
        })
    }
}

/// Client for the OpenAI chat completion API.
pub struct OpenAiClient {
    client: ProviderClient,
}

impl OpenAiClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: ProviderClient::new(config),
        }
    }

    /// Create from environment variables. `OPENAI_BASE_URL` overrides the
    /// default endpoint.
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        Self::new(ProviderConfig::new(
            "openai",
            base_url,
            AuthScheme::Bearer,
            Credential::from_env("OPENAI_API_KEY", 20),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_enabled()
    }

    pub fn credential_state(&self) -> &'static str {
        self.client.credential().state()
    }

    pub fn credential_error(&self) -> Option<ProviderError> {
        self.client.credential_error()
    }

    /// Run a chat completion.
    pub async fn chat(&self, request: &ChatRequest) -> ProviderResult<ChatReply> {
        let payload = request.normalize()?;
        let response = self.client.post_json(CHAT_COMPLETIONS_PATH, &payload).await?;
        let completion: ChatCompletionResponse = response.json()?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Unknown("completion contained no choices".to_string()))?;
        let usage = completion.usage.unwrap_or_default();

        Ok(ChatReply {
            content: choice.message.content,
            model: completion.model,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }

    /// Check provider reachability.
    pub async fn health(&self) -> bool {
        self.client.probe("/v1/models").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let request = ChatRequest {
            messages: vec![turn("user", "Hello")],
            ..Default::default()
        };
        let payload = request.normalize().unwrap();
        assert_eq!(payload["model"], DEFAULT_CHAT_MODEL);
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["max_tokens"], 1024);
    }

    #[test]
    fn test_normalize_rejects_empty_history() {
        let err = ChatRequest::default().normalize().unwrap_err();
        assert_eq!(err.error_type(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_normalize_rejects_unknown_role() {
        let request = ChatRequest {
            messages: vec![turn("bot", "Hello")],
            ..Default::default()
        };
        assert!(request.normalize().is_err());
    }

    #[test]
    fn test_normalize_clamps_temperature() {
        let request = ChatRequest {
            messages: vec![turn("user", "Hello")],
            temperature: Some(9.5),
            ..Default::default()
        };
        let payload = request.normalize().unwrap();
        assert_eq!(payload["temperature"], 2.0);
    }

    #[test]
    fn test_reply_data_is_stable() {
        let reply = ChatReply {
            content: "Hi".to_string(),
            model: "gpt-4o-mini".to_string(),
            prompt_tokens: 3,
            completion_tokens: 2,
        };
        assert_eq!(reply.to_data(), reply.to_data());
    }
}
