//! Storage interfaces.
//!
//! Every piece of application state lives behind one of these traits and
//! is addressed by key, never by reference identity. Handlers receive
//! `Arc<dyn …>` instances so the backing implementation can be swapped
//! without touching route code.

use async_trait::async_trait;

use lumen_models::{
    ChatMessage, Conversation, Listing, ListingCategory, Plan, Subscription, UserProfile,
};

use crate::error::StoreResult;

/// Sort order for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSort {
    /// Most recently created first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl ListingSort {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(ListingSort::Newest),
            "price_asc" => Some(ListingSort::PriceAsc),
            "price_desc" => Some(ListingSort::PriceDesc),
            _ => None,
        }
    }
}

/// Filter and pagination for listing queries.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub category: Option<ListingCategory>,
    pub sort: ListingSort,
    pub offset: usize,
    pub limit: usize,
}

/// Partial update for a listing. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<u32>,
    pub active: Option<bool>,
}

/// User profile records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, uid: &str) -> StoreResult<Option<UserProfile>>;
    async fn get_or_create(&self, uid: &str, email: Option<&str>) -> StoreResult<UserProfile>;
}

/// Conversations and their messages.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, conversation: Conversation) -> StoreResult<Conversation>;
    async fn get(&self, id: &str) -> StoreResult<Option<Conversation>>;
    /// All conversations owned by a user, most recently updated first.
    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Conversation>>;
    /// Delete a conversation and its messages. Errors if it does not exist.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Append a message and bump the conversation's `updated_at`.
    async fn append_message(&self, message: ChatMessage) -> StoreResult<ChatMessage>;
    /// Messages for a conversation in chronological order.
    async fn list_messages(&self, conversation_id: &str) -> StoreResult<Vec<ChatMessage>>;
}

/// Marketplace listings.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn create(&self, listing: Listing) -> StoreResult<Listing>;
    async fn get(&self, id: &str) -> StoreResult<Option<Listing>>;
    async fn update(&self, id: &str, patch: ListingPatch) -> StoreResult<Listing>;
    async fn delete(&self, id: &str) -> StoreResult<()>;
    async fn list(&self, query: ListingQuery) -> StoreResult<Vec<Listing>>;
}

/// Subscription plans and per-user subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// The fixed plan catalog.
    async fn plans(&self) -> StoreResult<Vec<Plan>>;
    async fn plan(&self, plan_id: &str) -> StoreResult<Option<Plan>>;
    /// The user's current subscription, if any.
    async fn current(&self, user_id: &str) -> StoreResult<Option<Subscription>>;
    /// Subscribe the user to a plan, replacing any previous subscription.
    async fn subscribe(&self, user_id: &str, plan_id: &str) -> StoreResult<Subscription>;
    /// Cancel the user's active subscription. Errors if none is active.
    async fn cancel(&self, user_id: &str) -> StoreResult<Subscription>;
}
