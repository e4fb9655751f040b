//! Admin API Handlers
//!
//! Every handler starts with `user.require_admin()`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Payment, PayoutStatus, Product, ProductCreate, ProductUpdate, Report, ReportResolve, Vendor,
};
use crate::db::repository::{
    PaymentRepository, ProductRepository, ReportRepository, VendorRepository, parse_id,
};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};
use shared::types::Page;

/// Vendor verification payload
#[derive(Debug, Deserialize)]
pub struct VerifyVendorRequest {
    pub verified: bool,
}

/// POST /api/admin/vendors/{id}/verify
pub async fn verify_vendor(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VerifyVendorRequest>,
) -> AppResult<Json<ApiResponse<Vendor>>> {
    user.require_admin()?;

    let vendor = VendorRepository::new(state.db.clone())
        .set_verified(&id, payload.verified)
        .await?;

    tracing::info!(vendor = %id, verified = payload.verified, "Vendor verification updated");
    Ok(ok(vendor))
}

/// Query params for the report list
#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub handled: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    shared::types::DEFAULT_PAGE_SIZE
}

/// GET /api/admin/reports
pub async fn list_reports(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ReportListQuery>,
) -> AppResult<Json<ApiResponse<Page<Report>>>> {
    user.require_admin()?;

    let limit = query.limit.clamp(1, shared::types::MAX_PAGE_SIZE);
    let offset = query.offset.max(0);
    let reports = ReportRepository::new(state.db.clone())
        .find_all(query.handled, limit, offset)
        .await?;
    Ok(ok(Page::new(reports, limit, offset)))
}

/// POST /api/admin/reports/{id}/resolve
pub async fn resolve_report(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReportResolve>,
) -> AppResult<Json<ApiResponse<Report>>> {
    user.require_admin()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let report = ReportRepository::new(state.db.clone())
        .resolve(&id, payload.resolution)
        .await?;
    Ok(ok_with_message(report, "Report resolved"))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    user.require_admin()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let product = ProductRepository::new(state.db.clone())
        .create(payload)
        .await?;

    state.cache.delete_by_prefix("products:");
    Ok(ok(product))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    user.require_admin()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let product = ProductRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;

    state.cache.delete_by_prefix("products:");
    if let Some(product_id) = &product.id {
        state.cache.delete(&product_id.to_string());
    }
    Ok(ok(product))
}

/// POST /api/admin/payouts/{payment_id}/{vendor_id}/settle
///
/// Marks one vendor's payout entry on a payment as settled. Actual money
/// movement to vendor bank accounts happens outside this system.
pub async fn settle_payout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((payment_id, vendor_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    user.require_admin()?;

    let vendor = parse_id("vendor", &vendor_id)?;
    let payment = PaymentRepository::new(state.db.clone())
        .set_payout_status(&payment_id, &vendor, PayoutStatus::Settled)
        .await?;

    state.cache.delete_by_prefix(&format!("{}:", vendor));
    tracing::info!(payment = %payment_id, vendor = %vendor, "Payout settled");
    Ok(ok(payment))
}
