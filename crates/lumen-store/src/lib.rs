//! Keyed storage for the Lumen backend.
//!
//! This crate provides:
//! - Repository traits for users, conversations, listings, and
//!   subscriptions
//! - An in-memory implementation backed by `RwLock<HashMap>` maps
//!
//! State is always addressed by key. Handlers depend on the traits, not
//! the implementation.

pub mod error;
pub mod memory;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repo::{
    ConversationStore, ListingPatch, ListingQuery, ListingSort, ListingStore, SubscriptionStore,
    UserStore,
};
