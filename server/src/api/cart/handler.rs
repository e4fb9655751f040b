//! Cart API Handlers
//!
//! The cart lives in process memory, keyed by the session user. Lines
//! snapshot the listing at add time; availability is re-checked at
//! checkout, not here.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::cart::CartLine;
use crate::core::ServerState;
use crate::db::repository::{ListingRepository, ProductRepository, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use shared::money;

/// Cart contents plus the display total
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    /// Sum over snapshot prices, minor units (display only)
    pub total: i64,
}

fn view_of(lines: Vec<CartLine>) -> CartView {
    let total = lines.iter().map(|l| l.unit_price * l.quantity).sum();
    CartView { lines, total }
}

/// GET /api/cart
pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(ok(view_of(state.carts.lines(&user.id))))
}

/// Add-to-cart payload
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub listing_id: String,
    pub quantity: i64,
}

/// POST /api/cart/add
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    money::validate_quantity(payload.quantity)?;
    let listing_id = parse_id("listing", &payload.listing_id)?;

    let listing = ListingRepository::new(state.db.clone())
        .find_by_id(&payload.listing_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ListingNotFound))?;
    if !listing.active {
        return Err(AppError::new(ErrorCode::ListingInactive));
    }

    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&listing.product.to_string())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    state.carts.add(
        &user.id,
        CartLine {
            listing_id: listing_id.to_string(),
            product_id: listing.product.to_string(),
            product_name: product.name,
            vendor_id: listing.vendor.to_string(),
            unit_price: listing.price,
            quantity: payload.quantity,
        },
    );

    Ok(ok(view_of(state.carts.lines(&user.id))))
}

/// Quantity update payload
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub listing_id: String,
    /// Zero removes the line
    pub quantity: i64,
}

/// PUT /api/cart/update
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UpdateRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    if payload.quantity > 0 {
        money::validate_quantity(payload.quantity)?;
    }
    let listing_id = parse_id("listing", &payload.listing_id)?;

    if !state
        .carts
        .set_quantity(&user.id, &listing_id.to_string(), payload.quantity)
    {
        return Err(AppError::not_found("Cart line"));
    }
    Ok(ok(view_of(state.carts.lines(&user.id))))
}

/// DELETE /api/cart/remove/{listing_id}
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(listing_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let listing_id = parse_id("listing", &listing_id)?;
    if !state.carts.remove(&user.id, &listing_id.to_string()) {
        return Err(AppError::not_found("Cart line"));
    }
    Ok(ok(view_of(state.carts.lines(&user.id))))
}

/// DELETE /api/cart/clear
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<()>>> {
    state.carts.clear(&user.id);
    Ok(ok_with_message((), "Cart cleared"))
}
