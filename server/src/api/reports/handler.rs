//! Report API Handlers

use axum::{Json, extract::State};
use chrono::Utc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Report, ReportCreate};
use crate::db::repository::{ReportRepository, VendorRepository, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// POST /api/reports - file a complaint against a vendor
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReportCreate>,
) -> AppResult<Json<ApiResponse<Report>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let vendor = VendorRepository::new(state.db.clone())
        .find_by_id(&payload.vendor_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VendorNotFound))?;
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;

    let listing = payload
        .listing_id
        .as_deref()
        .map(|id| parse_id("listing", id))
        .transpose()?;

    let report = ReportRepository::new(state.db.clone())
        .create(Report {
            id: None,
            reporter: user.record_id()?,
            vendor: vendor_id,
            listing,
            reason: payload.reason,
            details: payload.details,
            handled: false,
            resolution: None,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        report = %report.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        vendor = %report.vendor,
        "Report filed"
    );
    Ok(ok(report))
}
