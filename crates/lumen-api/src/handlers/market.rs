//! Marketplace API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use lumen_models::{Listing, ListingCategory, ServiceEnvelope};
use lumen_store::{ListingPatch, ListingQuery, ListingSort};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::security::is_valid_id;
use crate::state::AppState;

/// Maximum page size for listing queries.
const MAX_LIMIT: usize = 100;

fn parse_category(s: &str) -> ApiResult<ListingCategory> {
    ListingCategory::from_str(s).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Invalid category '{}'. Must be one of: persona, voice_pack, prompt_pack",
            s
        ))
    })
}

/// Look up a listing and check the caller owns it.
async fn owned_listing(state: &AppState, user: &AuthUser, listing_id: &str) -> ApiResult<Listing> {
    if !is_valid_id(listing_id) {
        return Err(ApiError::bad_request("Invalid listing ID format"));
    }
    let listing = state
        .listings
        .get(listing_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    if listing.seller_id != user.uid {
        return Err(ApiError::forbidden("You do not own this listing"));
    }
    Ok(listing)
}

/// Listing creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[validate(range(max = 1_000_000))]
    pub price_cents: u32,
}

/// Create a listing.
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateListingRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let category = parse_category(&request.category)?;

    let listing = state
        .listings
        .create(Listing::new(
            &user.uid,
            request.title.trim(),
            request.description.trim(),
            category,
            request.price_cents,
        ))
        .await?;

    Ok(Json(ServiceEnvelope::success(json!({"listing": listing}))))
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListListingsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// List active listings with optional category filter and price sort.
pub async fn list_listings(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListListingsQuery>,
) -> ApiResult<Json<ServiceEnvelope>> {
    let category = match query.category.as_deref() {
        Some(c) => Some(parse_category(c)?),
        None => None,
    };
    let sort = match query.sort.as_deref() {
        Some(s) => ListingSort::from_str(s).ok_or_else(|| {
            ApiError::bad_request(format!(
                "Invalid sort '{}'. Must be one of: newest, price_asc, price_desc",
                s
            ))
        })?,
        None => ListingSort::default(),
    };

    let listings = state
        .listings
        .list(ListingQuery {
            category,
            sort,
            offset: query.offset.unwrap_or(0),
            limit: query.limit.unwrap_or(0).min(MAX_LIMIT),
        })
        .await?;

    Ok(Json(ServiceEnvelope::success(json!({
        "count": listings.len(),
        "listings": listings,
    }))))
}

/// Fetch one listing (no ownership requirement).
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    _user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    if !is_valid_id(&listing_id) {
        return Err(ApiError::bad_request("Invalid listing ID format"));
    }
    let listing = state
        .listings
        .get(&listing_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    Ok(Json(ServiceEnvelope::success(json!({"listing": listing}))))
}

/// Listing update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 120))]
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(max = 1_000_000))]
    #[serde(default)]
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Update a listing the caller owns.
pub async fn update_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    user: AuthUser,
    Json(request): Json<UpdateListingRequest>,
) -> ApiResult<Json<ServiceEnvelope>> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    owned_listing(&state, &user, &listing_id).await?;

    let listing = state
        .listings
        .update(
            &listing_id,
            ListingPatch {
                title: request.title.map(|t| t.trim().to_string()),
                description: request.description.map(|d| d.trim().to_string()),
                price_cents: request.price_cents,
                active: request.active,
            },
        )
        .await?;

    Ok(Json(ServiceEnvelope::success(json!({"listing": listing}))))
}

/// Delete a listing the caller owns.
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<ServiceEnvelope>> {
    owned_listing(&state, &user, &listing_id).await?;
    state.listings.delete(&listing_id).await?;
    info!(listing_id = %listing_id, "Deleted listing");
    Ok(Json(ServiceEnvelope::success(json!({"deleted": true}))))
}
