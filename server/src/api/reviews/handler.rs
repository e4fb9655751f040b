//! Review API Handlers
//!
//! The review gate: a review needs a paid-or-later order, owned by the
//! caller, containing the exact product being reviewed. One review per
//! (user, order, product) — the unique index makes the application check
//! merely a better error message; concurrent duplicates die in storage.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderStatus, Review, ReviewCreate, ReviewUpdate};
use crate::db::repository::{OrderRepository, RepoError, ReviewRepository, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use shared::types::{Page, PageQuery};

fn invalidate_review_views(state: &ServerState, review: &Review) {
    state
        .cache
        .delete_by_prefix(&format!("reviews:{}:", review.product));
    state.cache.delete(&review.product.to_string());
    state
        .cache
        .delete_by_prefix(&format!("{}:", review.vendor));
}

/// POST /api/reviews
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let customer = user.record_id()?;
    let product = parse_id("product", &payload.product_id)?;

    // proof of purchase: a paid-or-later order of the caller's containing
    // this product
    let order = OrderRepository::new(state.db.clone())
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if order.customer != customer {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    }
    if matches!(order.status, OrderStatus::Pending | OrderStatus::Cancelled) {
        return Err(AppError::new(ErrorCode::ReviewNotEligible));
    }
    let line = order
        .lines
        .iter()
        .find(|l| l.product == product)
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotEligible))?;

    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("order missing id"))?;

    let review = ReviewRepository::new(state.db.clone())
        .create(Review {
            id: None,
            user: customer,
            order_ref: order_id,
            product,
            vendor: line.vendor.clone(),
            listing: line.listing.clone(),
            rating: payload.rating,
            comment: payload.comment,
            created_at: Utc::now(),
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::ReviewExists),
            other => other.into(),
        })?;

    invalidate_review_views(&state, &review);
    Ok(ok(review))
}

/// GET /api/reviews/product/{product_id}
pub async fn list_for_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let product = parse_id("product", &product_id)?;
    let (limit, offset) = query.clamped();

    let key = format!("reviews:{}:{}:{}", product, limit, offset);
    if let Some(cached) = state.cache.get(&key) {
        return Ok(ok(cached));
    }

    let reviews = ReviewRepository::new(state.db.clone())
        .find_by_product(&product, limit, offset)
        .await?;

    let value = serde_json::to_value(Page::new(reviews, limit, offset))
        .map_err(|e| AppError::internal(e.to_string()))?;
    state.cache.set(key, value.clone());
    Ok(ok(value))
}

/// Author-or-admin guard used by update/delete
async fn owned_review(
    state: &ServerState,
    user: &CurrentUser,
    id: &str,
) -> AppResult<Review> {
    let review = ReviewRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound))?;
    if review.user != user.record_id()? && !user.is_admin() {
        return Err(AppError::new(ErrorCode::ReviewNotFound));
    }
    Ok(review)
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    owned_review(&state, &user, &id).await?;
    let review = ReviewRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    invalidate_review_views(&state, &review);
    Ok(ok(review))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let review = owned_review(&state, &user, &id).await?;
    ReviewRepository::new(state.db.clone()).delete(&id).await?;
    invalidate_review_views(&state, &review);
    Ok(ok_with_message((), "Review deleted"))
}
