//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Payment, PayoutStatus, Vendor, VendorCreate, VendorUpdate};
use crate::db::repository::{
    ListingRepository, PaymentRepository, RepoError, ReviewRepository, VendorRepository,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::types::{Page, PageQuery};

/// Resolve the caller's vendor profile, or fail with `VendorNotFound`.
///
/// Shared with the listings and orders modules.
pub(crate) async fn current_vendor(
    state: &ServerState,
    user: &CurrentUser,
) -> AppResult<Vendor> {
    user.require_vendor()?;
    let repo = VendorRepository::new(state.db.clone());
    repo.find_by_user(&user.record_id()?)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VendorNotFound))
}

/// POST /api/vendors - create the caller's store profile
pub async fn create_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VendorCreate>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    user.require_vendor()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = VendorRepository::new(state.db.clone());
    let vendor = repo
        .create(user.record_id()?, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::already_exists("Vendor profile"),
            other => other.into(),
        })?;

    tracing::info!(vendor = %vendor.store_name, user = %user.id, "Vendor profile created");
    Ok(ok(vendor))
}

/// GET /api/vendors/me
pub async fn my_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    Ok(ok(current_vendor(&state, &user).await?))
}

/// PUT /api/vendors/me
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VendorUpdate>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let repo = VendorRepository::new(state.db.clone());
    let updated = repo.update(&vendor_id, payload).await?;
    Ok(ok(updated))
}

/// Public view of a vendor
#[derive(Debug, Serialize)]
pub struct VendorPublic {
    pub id: String,
    pub store_name: String,
    pub description: Option<String>,
    pub verified: bool,
    pub rating_count: i64,
    pub rating_mean: Option<f64>,
}

/// GET /api/vendors/{id}
pub async fn public_profile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<VendorPublic>>> {
    let repo = VendorRepository::new(state.db.clone());
    let vendor = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VendorNotFound))?;
    let vendor_id = vendor.id.clone().ok_or_else(|| AppError::internal("vendor missing id"))?;

    let stats = ReviewRepository::new(state.db.clone())
        .stats_for_vendor(&vendor_id)
        .await?;

    Ok(ok(VendorPublic {
        id: vendor_id.to_string(),
        store_name: vendor.store_name,
        description: vendor.description,
        verified: vendor.verified,
        rating_count: stats.count,
        rating_mean: stats.mean,
    }))
}

/// Vendor dashboard aggregates, computed at read time
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub listing_count: usize,
    pub total_stock: i64,
    /// Net revenue already settled to the vendor, minor units
    pub settled_net: i64,
    /// Net revenue still pending payout, minor units
    pub pending_net: i64,
    pub rating_count: i64,
    pub rating_mean: Option<f64>,
}

/// GET /api/vendors/me/dashboard
pub async fn dashboard(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor.id.clone().ok_or_else(|| AppError::internal("vendor missing id"))?;

    let key = format!("{}:dashboard", vendor_id);
    if let Some(cached) = state.cache.get(&key) {
        return Ok(ok(cached));
    }

    let listings = ListingRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id)
        .await?;

    let payments = PaymentRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id, 1000, 0)
        .await?;
    let (mut settled_net, mut pending_net) = (0i64, 0i64);
    for payment in &payments {
        for entry in payment.payouts.iter().filter(|p| p.vendor == vendor_id) {
            match entry.status {
                PayoutStatus::Settled => settled_net += entry.net,
                PayoutStatus::Pending => pending_net += entry.net,
            }
        }
    }

    let stats = ReviewRepository::new(state.db.clone())
        .stats_for_vendor(&vendor_id)
        .await?;

    let dashboard = Dashboard {
        listing_count: listings.len(),
        total_stock: listings.iter().map(|l| l.stock).sum(),
        settled_net,
        pending_net,
        rating_count: stats.count,
        rating_mean: stats.mean,
    };

    let value = serde_json::to_value(&dashboard).map_err(|e| AppError::internal(e.to_string()))?;
    state.cache.set(key, value.clone());
    Ok(ok(value))
}

/// GET /api/vendors/me/payouts - payments carrying a payout for the caller
pub async fn my_payouts(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<Page<Payment>>>> {
    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor.id.clone().ok_or_else(|| AppError::internal("vendor missing id"))?;

    let (limit, offset) = query.clamped();
    let payments = PaymentRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id, limit, offset)
        .await?;

    Ok(ok(Page::new(payments, limit, offset)))
}
