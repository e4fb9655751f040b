//! Product API Handlers
//!
//! Read-heavy endpoints, fronted by the response cache. Cache keys:
//! `products:{category}:{limit}:{offset}` for lists (flushed together by
//! any catalog or stock write) and the record id itself (`product:xyz`)
//! for the detail view.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Listing, Product};
use crate::db::repository::{ListingRepository, ProductRepository, ReviewRepository, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::types::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Query params for the product list
///
/// Kept flat: query-string deserialization dislikes nested numerics.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Product detail with offers and read-time rating aggregate
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub listings: Vec<Listing>,
    pub rating_count: i64,
    pub rating_mean: Option<f64>,
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.max(0);
    let key = format!(
        "products:{}:{}:{}",
        query.category.as_deref().unwrap_or("all"),
        limit,
        offset
    );

    if let Some(cached) = state.cache.get(&key) {
        return Ok(ok(cached));
    }

    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all(query.category, limit, offset).await?;

    let value = serde_json::to_value(&products).map_err(|e| AppError::internal(e.to_string()))?;
    state.cache.set(key, value.clone());
    Ok(ok(value))
}

/// GET /api/products/{id}
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let product_id = parse_id("product", &id)?;
    let key = product_id.to_string();

    if let Some(cached) = state.cache.get(&key) {
        return Ok(ok(cached));
    }

    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let listings = ListingRepository::new(state.db.clone())
        .find_by_product(&product_id)
        .await?;

    let stats = ReviewRepository::new(state.db.clone())
        .stats_for_product(&product_id)
        .await?;

    let detail = ProductDetail {
        product,
        listings,
        rating_count: stats.count,
        rating_mean: stats.mean,
    };

    let value = serde_json::to_value(&detail).map_err(|e| AppError::internal(e.to_string()))?;
    state.cache.set(key, value.clone());
    Ok(ok(value))
}
