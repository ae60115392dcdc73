//! Chat API handlers.
//!
//! Conversations and messages live in the injected store. Sending a
//! message proxies to the chat provider when it is enabled; otherwise the
//! deterministic fallback stub answers so the endpoint keeps working
//! without a key.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use lumen_models::{ChatMessage, Conversation, ServiceEnvelope};
use lumen_providers::{ChatRequest, ChatTurn};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{is_valid_id, sanitize_text, sanitize_title, MAX_MESSAGE_LENGTH};
use crate::state::AppState;

/// How much history is replayed to the provider per message.
const HISTORY_WINDOW: usize = 20;

/// Look up a conversation and check ownership. A foreign conversation is
/// reported as not found rather than forbidden.
async fn owned_conversation(
    state: &AppState,
    user: &AuthUser,
    conversation_id: &str,
) -> ApiResult<Conversation> {
    if !is_valid_id(conversation_id) {
        return Err(ApiError::bad_request("Invalid conversation ID format"));
    }
    let conversation = state
        .conversations
        .get(conversation_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Conversation not found"))?;
    if conversation.user_id != user.uid {
        return Err(ApiError::not_found("Conversation not found"));
    }
    Ok(conversation)
}

/// Conversation creation request.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Create a conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateConversationRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    state
        .users
        .get_or_create(&user.uid, user.email.as_deref())
        .await?;

    let title = match request.title.as_deref() {
        Some(title) if !title.trim().is_empty() => sanitize_title(title),
        _ => "New conversation".to_string(),
    };

    let conversation = state
        .conversations
        .create(Conversation::new(&user.uid, title))
        .await?;

    Ok(Json(ServiceEnvelope::success(json!({
        "conversation": conversation
    }))))
}

/// List the user's conversations.
pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let conversations = state.conversations.list_for_user(&user.uid).await?;
    Ok(Json(ServiceEnvelope::success(json!({
        "conversations": conversations
    }))))
}

/// Fetch one conversation.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    let conversation = owned_conversation(&state, &user, &conversation_id).await?;
    Ok(Json(ServiceEnvelope::success(json!({
        "conversation": conversation
    }))))
}

/// Delete a conversation and its messages.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    owned_conversation(&state, &user, &conversation_id).await?;
    state.conversations.delete(&conversation_id).await?;
    info!(conversation_id = %conversation_id, "Deleted conversation");
    Ok(Json(ServiceEnvelope::success(json!({"deleted": true}))))
}

/// Message send request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Send a message and get the assistant reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    user: AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    owned_conversation(&state, &user, &conversation_id).await?;

    let content = sanitize_text(request.content.trim(), MAX_MESSAGE_LENGTH);
    if content.is_empty() {
        return Err(ApiError::bad_request("Message content must not be empty"));
    }

    state
        .conversations
        .append_message(ChatMessage::user(&conversation_id, &content))
        .await?;

    let reply = if state.openai.is_enabled() {
        let history = state.conversations.list_messages(&conversation_id).await?;
        let turns: Vec<ChatTurn> = history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .rev()
            .map(|m| ChatTurn {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();

        let result = state
            .openai
            .chat(&ChatRequest {
                messages: turns,
                ..Default::default()
            })
            .await;
        metrics::record_provider_call("openai", if result.is_ok() { "ok" } else { "error" });
        let completion = result?;
        ChatMessage::assistant(&conversation_id, completion.content, completion.model)
    } else {
        ChatMessage::fallback(&conversation_id, state.analysis.fallback_reply(&content))
    };

    let reply = state.conversations.append_message(reply).await?;

    Ok(Json(ServiceEnvelope::success(json!({
        "conversationId": conversation_id,
        "message": reply,
    }))))
}

/// List a conversation's messages in chronological order.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    owned_conversation(&state, &user, &conversation_id).await?;
    let messages = state.conversations.list_messages(&conversation_id).await?;
    Ok(Json(ServiceEnvelope::success(json!({
        "conversationId": conversation_id,
        "messages": messages,
    }))))
}
