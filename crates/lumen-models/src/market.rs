//! Marketplace listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a marketplace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    /// A chat persona definition.
    Persona,
    /// A curated voice preset pack.
    VoicePack,
    /// A prompt template pack.
    PromptPack,
}

impl ListingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCategory::Persona => "persona",
            ListingCategory::VoicePack => "voice_pack",
            ListingCategory::PromptPack => "prompt_pack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "persona" => Some(ListingCategory::Persona),
            "voice_pack" => Some(ListingCategory::VoicePack),
            "prompt_pack" => Some(ListingCategory::PromptPack),
            _ => None,
        }
    }
}

/// A marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub category: ListingCategory,
    /// Price in minor currency units (cents).
    pub price_cents: u32,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        seller_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ListingCategory,
        price_cents: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            seller_id: seller_id.into(),
            title: title.into(),
            description: description.into(),
            category,
            price_cents,
            currency: "usd".to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
