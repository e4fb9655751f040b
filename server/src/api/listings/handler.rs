//! Listing API Handlers
//!
//! Listing writes are vendor-scoped: only the owning (verified) vendor
//! may create or edit an offer. Every write drops the cached product
//! views that embed listing data.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use validator::Validate;

use crate::api::vendors::handler::current_vendor;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Listing, ListingCreate, ListingUpdate};
use crate::db::repository::{ListingRepository, ProductRepository, RepoError, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::money;

fn invalidate_listing_views(state: &ServerState, listing: &Listing) {
    state.cache.delete_by_prefix("products:");
    state.cache.delete(&listing.product.to_string());
    state
        .cache
        .delete_by_prefix(&format!("{}:", listing.vendor));
}

/// GET /api/listings/product/{product_id} - active offers for a product
pub async fn list_for_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Listing>>>> {
    let product = parse_id("product", &product_id)?;
    let listings = ListingRepository::new(state.db.clone())
        .find_by_product(&product)
        .await?;
    Ok(ok(listings))
}

/// GET /api/listings/mine - all of the caller's listings
pub async fn my_listings(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Listing>>>> {
    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;
    let listings = ListingRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id)
        .await?;
    Ok(ok(listings))
}

/// POST /api/listings - create an offer (verified vendors only)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ListingCreate>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    money::validate_amount(payload.price, "price")?;

    let vendor = current_vendor(&state, &user).await?;
    if !vendor.verified {
        return Err(AppError::new(ErrorCode::VendorNotVerified));
    }
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;

    let product_id = parse_id("product", &payload.product_id)?;
    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if !product.active {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    let listing = ListingRepository::new(state.db.clone())
        .create(Listing {
            id: None,
            product: product_id,
            vendor: vendor_id,
            price: payload.price,
            stock: payload.stock,
            active: true,
            created_at: Utc::now(),
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::ListingExists),
            other => other.into(),
        })?;

    invalidate_listing_views(&state, &listing);
    tracing::info!(
        listing = %listing.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        vendor = %listing.vendor,
        "Listing created"
    );
    Ok(ok(listing))
}

/// PUT /api/listings/{id} - price/stock/active update by the owner
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ListingUpdate>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if let Some(price) = payload.price {
        money::validate_amount(price, "price")?;
    }

    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;

    let repo = ListingRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ListingNotFound))?;
    if existing.vendor != vendor_id {
        return Err(AppError::permission_denied("not your listing"));
    }

    let listing = repo.update(&id, payload).await?;
    invalidate_listing_views(&state, &listing);
    Ok(ok(listing))
}
