//! Request handlers.

pub mod chat;
pub mod generate;
pub mod health;
pub mod market;
pub mod providers;
pub mod subscriptions;

pub use chat::*;
pub use generate::*;
pub use health::*;
pub use market::*;
pub use providers::*;
pub use subscriptions::*;
