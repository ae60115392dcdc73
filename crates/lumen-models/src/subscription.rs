//! Subscription plans and user subscriptions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subscription plan from the fixed catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Monthly price in minor currency units (cents).
    pub price_cents: u32,
    /// Generation credits included per month.
    pub monthly_credits: u32,
    pub features: Vec<String>,
}

/// State of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

/// A user's subscription to a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub renews_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Start a new active subscription renewing in 30 days.
    pub fn start(user_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            plan_id: plan_id.into(),
            status: SubscriptionStatus::Active,
            started_at: now,
            renews_at: now + Duration::days(30),
            canceled_at: None,
        }
    }

    /// Mark the subscription canceled.
    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Canceled;
        self.canceled_at = Some(Utc::now());
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_lifecycle() {
        let mut sub = Subscription::start("u1", "plus");
        assert!(sub.is_active());
        assert!(sub.renews_at > sub.started_at);

        sub.cancel();
        assert!(!sub.is_active());
        assert!(sub.canceled_at.is_some());
    }
}
