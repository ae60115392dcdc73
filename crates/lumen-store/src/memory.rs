//! In-memory store implementation.
//!
//! Backs every interface with a `RwLock<HashMap<K, V>>`. Records are
//! cloned on the way in and out; nothing hands out a reference into the
//! maps, so identity is purely by key.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use lumen_models::{
    ChatMessage, Conversation, Listing, ListingCategory, Plan, Subscription, UserProfile,
};

use crate::error::{StoreError, StoreResult};
use crate::repo::{
    ConversationStore, ListingPatch, ListingQuery, ListingSort, ListingStore, SubscriptionStore,
    UserStore,
};

/// Default page size for listing queries when the caller passes 0.
const DEFAULT_PAGE_SIZE: usize = 50;

/// In-memory store backing all repository interfaces.
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserProfile>>,
    conversations: RwLock<HashMap<String, Conversation>>,
    /// Messages keyed by conversation id, kept in append order.
    messages: RwLock<HashMap<String, Vec<ChatMessage>>>,
    listings: RwLock<HashMap<String, Listing>>,
    /// Subscriptions keyed by user id; one per user.
    subscriptions: RwLock<HashMap<String, Subscription>>,
    plans: Vec<Plan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            conversations: RwLock::new(HashMap::new()),
            messages: RwLock::new(HashMap::new()),
            listings: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            plans: plan_catalog(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed plan catalog.
fn plan_catalog() -> Vec<Plan> {
    vec![
        Plan {
            id: "free".to_string(),
            name: "Free".to_string(),
            price_cents: 0,
            monthly_credits: 50,
            features: vec!["Chat with fallback replies".to_string()],
        },
        Plan {
            id: "plus".to_string(),
            name: "Plus".to_string(),
            price_cents: 999,
            monthly_credits: 500,
            features: vec![
                "Chat completions".to_string(),
                "Voice synthesis".to_string(),
            ],
        },
        Plan {
            id: "pro".to_string(),
            name: "Pro".to_string(),
            price_cents: 2999,
            monthly_credits: 2500,
            features: vec![
                "Chat completions".to_string(),
                "Voice synthesis".to_string(),
                "Image and video generation".to_string(),
            ],
        },
    ]
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn get_or_create(&self, uid: &str, email: Option<&str>) -> StoreResult<UserProfile> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.get(uid) {
            return Ok(existing.clone());
        }
        let profile = UserProfile::new(uid, email.map(|e| e.to_string()));
        users.insert(uid.to_string(), profile.clone());
        info!(uid = %uid, "Created user profile");
        Ok(profile)
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(&self, conversation: Conversation) -> StoreResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Conversation>> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let mut result: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self.conversations.write().await.remove(id);
        if removed.is_none() {
            return Err(StoreError::not_found(format!("conversation {}", id)));
        }
        self.messages.write().await.remove(id);
        Ok(())
    }

    async fn append_message(&self, message: ChatMessage) -> StoreResult<ChatMessage> {
        {
            let mut conversations = self.conversations.write().await;
            let conversation = conversations
                .get_mut(&message.conversation_id)
                .ok_or_else(|| {
                    StoreError::not_found(format!("conversation {}", message.conversation_id))
                })?;
            conversation.updated_at = message.created_at;
        }

        let mut messages = self.messages.write().await;
        messages
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, conversation_id: &str) -> StoreResult<Vec<ChatMessage>> {
        let messages = self.messages.read().await;
        let mut result = messages.get(conversation_id).cloned().unwrap_or_default();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn create(&self, listing: Listing) -> StoreResult<Listing> {
        let mut listings = self.listings.write().await;
        listings.insert(listing.id.clone(), listing.clone());
        info!(listing_id = %listing.id, "Created listing");
        Ok(listing)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Listing>> {
        Ok(self.listings.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: ListingPatch) -> StoreResult<Listing> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(format!("listing {}", id)))?;

        if let Some(title) = patch.title {
            listing.title = title;
        }
        if let Some(description) = patch.description {
            listing.description = description;
        }
        if let Some(price_cents) = patch.price_cents {
            listing.price_cents = price_cents;
        }
        if let Some(active) = patch.active {
            listing.active = active;
        }
        listing.updated_at = chrono::Utc::now();
        Ok(listing.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.listings
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(format!("listing {}", id)))
    }

    async fn list(&self, query: ListingQuery) -> StoreResult<Vec<Listing>> {
        let listings = self.listings.read().await;
        let mut result: Vec<Listing> = listings
            .values()
            .filter(|l| l.active)
            .filter(|l| match query.category {
                Some(category) => l.category == category,
                None => true,
            })
            .cloned()
            .collect();

        match query.sort {
            ListingSort::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ListingSort::PriceAsc => result.sort_by_key(|l| l.price_cents),
            ListingSort::PriceDesc => {
                result.sort_by_key(|l| std::cmp::Reverse(l.price_cents))
            }
        }

        let limit = if query.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            query.limit
        };
        Ok(result.into_iter().skip(query.offset).take(limit).collect())
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn plans(&self) -> StoreResult<Vec<Plan>> {
        Ok(self.plans.clone())
    }

    async fn plan(&self, plan_id: &str) -> StoreResult<Option<Plan>> {
        Ok(self.plans.iter().find(|p| p.id == plan_id).cloned())
    }

    async fn current(&self, user_id: &str) -> StoreResult<Option<Subscription>> {
        Ok(self.subscriptions.read().await.get(user_id).cloned())
    }

    async fn subscribe(&self, user_id: &str, plan_id: &str) -> StoreResult<Subscription> {
        if !self.plans.iter().any(|p| p.id == plan_id) {
            return Err(StoreError::invalid_input(format!(
                "unknown plan '{}'",
                plan_id
            )));
        }

        let subscription = Subscription::start(user_id, plan_id);
        self.subscriptions
            .write()
            .await
            .insert(user_id.to_string(), subscription.clone());
        info!(user_id = %user_id, plan_id = %plan_id, "Subscription started");
        Ok(subscription)
    }

    async fn cancel(&self, user_id: &str) -> StoreResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .get_mut(user_id)
            .ok_or_else(|| StoreError::not_found(format!("subscription for {}", user_id)))?;

        if !subscription.is_active() {
            return Err(StoreError::conflict("subscription already canceled"));
        }
        subscription.cancel();
        Ok(subscription.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_models::ListingCategory;

    #[tokio::test]
    async fn test_user_get_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.get_or_create("u1", Some("a@example.com")).await.unwrap();
        let b = store.get_or_create("u1", None).await.unwrap();
        assert_eq!(a.uid, b.uid);
        assert_eq!(b.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn test_conversation_crud_and_message_order() {
        let store = MemoryStore::new();
        let conv = ConversationStore::create(&store, Conversation::new("u1", "First chat"))
            .await
            .unwrap();

        store
            .append_message(ChatMessage::user(&conv.id, "hello"))
            .await
            .unwrap();
        store
            .append_message(ChatMessage::fallback(&conv.id, "hi"))
            .await
            .unwrap();

        let messages = store.list_messages(&conv.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].content, "hi");

        ConversationStore::delete(&store, &conv.id).await.unwrap();
        assert!(ConversationStore::get(&store, &conv.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.list_messages(&conv.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation_fails() {
        let store = MemoryStore::new();
        let err = store
            .append_message(ChatMessage::user("nope", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_filter_and_sort() {
        let store = MemoryStore::new();
        for listing in [
            Listing::new("u1", "Cheap persona", "", ListingCategory::Persona, 100),
            Listing::new("u1", "Pricey persona", "", ListingCategory::Persona, 900),
            Listing::new("u2", "Voices", "", ListingCategory::VoicePack, 500),
        ] {
            ListingStore::create(&store, listing).await.unwrap();
        }

        let personas = store
            .list(ListingQuery {
                category: Some(ListingCategory::Persona),
                sort: ListingSort::PriceAsc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].price_cents, 100);
        assert_eq!(personas[1].price_cents, 900);
    }

    #[tokio::test]
    async fn test_deactivated_listing_is_hidden() {
        let store = MemoryStore::new();
        let listing = ListingStore::create(
            &store,
            Listing::new("u1", "Persona", "", ListingCategory::Persona, 100),
        )
        .await
        .unwrap();

        store
            .update(
                &listing.id,
                ListingPatch {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let visible = store.list(ListingQuery::default()).await.unwrap();
        assert!(visible.is_empty());
        // Still reachable by key.
        assert!(ListingStore::get(&store, &listing.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_subscription_flow() {
        let store = MemoryStore::new();
        assert!(store.current("u1").await.unwrap().is_none());

        let sub = store.subscribe("u1", "plus").await.unwrap();
        assert!(sub.is_active());

        let canceled = store.cancel("u1").await.unwrap();
        assert!(!canceled.is_active());

        // Double-cancel conflicts.
        let err = store.cancel("u1").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Unknown plan is rejected.
        let err = store.subscribe("u1", "enterprise").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }
}
