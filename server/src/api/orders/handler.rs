//! Order API Handlers
//!
//! Thin wrappers over [`CheckoutService`]; fulfilment transitions are
//! conditional updates so a lost race reads as a status conflict, never
//! a silent overwrite.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::vendors::handler::current_vendor;
use crate::auth::CurrentUser;
use crate::checkout::{CreateOrderResponse, VerifyPaymentRequest};
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::db::repository::{OrderRepository, parse_id};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use shared::types::{DEFAULT_PAGE_SIZE, Page, PageQuery};

/// POST /api/orders/create-order
///
/// Body: none — the session cart is the input.
pub async fn create_order(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CreateOrderResponse>>> {
    let response = state.checkout().create_order(&user.record_id()?).await?;
    Ok(ok(response))
}

/// Demo confirmation payload
#[derive(Debug, Deserialize)]
pub struct DemoCheckoutRequest {
    pub order_id: String,
}

/// POST /api/orders/demo-checkout
pub async fn demo_checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DemoCheckoutRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .checkout()
        .confirm_demo(&user.record_id()?, &payload.order_id)
        .await?;
    Ok(ok_with_message(order, "Payment confirmed (demo)"))
}

/// POST /api/orders/verify-payment
pub async fn verify_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .checkout()
        .verify_gateway(&user.record_id()?, payload)
        .await?;
    Ok(ok_with_message(order, "Payment verified"))
}

/// GET /api/orders/my-orders
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let (limit, offset) = query.clamped();
    let customer = user.record_id()?;

    // only the first page is cached; settlement drops the exact key
    let cache_key = (offset == 0 && limit == DEFAULT_PAGE_SIZE)
        .then(|| format!("{}:orders", customer));
    if let Some(key) = &cache_key
        && let Some(cached) = state.cache.get(key)
    {
        return Ok(ok(cached));
    }

    let orders = OrderRepository::new(state.db.clone())
        .find_by_customer(&customer, limit, offset)
        .await?;

    let value = serde_json::to_value(Page::new(orders, limit, offset))
        .map_err(|e| AppError::internal(e.to_string()))?;
    if let Some(key) = cache_key {
        state.cache.set(key, value.clone());
    }
    Ok(ok(value))
}

/// GET /api/orders/vendor/my-orders
pub async fn vendor_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<Page<Order>>>> {
    let vendor = current_vendor(&state, &user).await?;
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;

    let (limit, offset) = query.clamped();
    let orders = OrderRepository::new(state.db.clone())
        .find_by_vendor(&vendor_id, limit, offset)
        .await?;
    Ok(ok(Page::new(orders, limit, offset)))
}

/// GET /api/orders/{id}
///
/// Visible to the owner, any vendor with a line in the order, and admins.
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.customer == user.record_id()? || user.is_admin() {
        return Ok(ok(order));
    }
    if let Ok(vendor) = current_vendor(&state, &user).await
        && let Some(vendor_id) = vendor.id
        && order.lines.iter().any(|l| l.vendor == vendor_id)
    {
        return Ok(ok(order));
    }
    Err(AppError::new(ErrorCode::OrderNotFound))
}

/// A vendor involved in the order may move it forward
async fn vendor_transition(
    state: &ServerState,
    user: &CurrentUser,
    order_id: &str,
    from: OrderStatus,
    to: OrderStatus,
) -> AppResult<Order> {
    let vendor = current_vendor(state, user).await?;
    let vendor_id = vendor.id.ok_or_else(|| AppError::internal("vendor missing id"))?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if !order.lines.iter().any(|l| l.vendor == vendor_id) {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    }

    let rid = parse_id("customer_order", order_id)?;
    repo.transition(&rid, from, to)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidStatusTransition))
}

/// POST /api/orders/{id}/ship
pub async fn ship(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order =
        vendor_transition(&state, &user, &id, OrderStatus::Paid, OrderStatus::Shipped).await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/deliver
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = vendor_transition(
        &state,
        &user,
        &id,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    )
    .await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/cancel
///
/// Owners may cancel a pending order; admins may also cancel paid ones.
/// Stock is never restored by cancellation.
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let allowed_from = if user.is_admin() {
        vec![OrderStatus::Pending, OrderStatus::Paid]
    } else if order.customer == user.record_id()? {
        vec![OrderStatus::Pending]
    } else {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    };

    let rid = parse_id("customer_order", &id)?;
    let cancelled = repo
        .cancel(&rid, allowed_from, format!("cancelled by {}", user.id))
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidStatusTransition))?;

    state.cache.delete(&format!("{}:orders", cancelled.customer));
    Ok(ok_with_message(cancelled, "Order cancelled"))
}
