//! API routes
//!
//! # Structure
//!
//! - [`auth`] - registration, login, session info
//! - [`products`] - public catalog reads (cached)
//! - [`listings`] - vendor offers and stock
//! - [`cart`] - session cart operations
//! - [`orders`] - the checkout pipeline surface
//! - [`reviews`] - purchase-gated reviews
//! - [`reports`] - vendor complaints
//! - [`vendors`] - store profiles, dashboard, payouts
//! - [`admin`] - moderation: verification, reports, catalog, payout settlement
//! - [`health`] - liveness probe

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod listings;
pub mod orders;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod vendors;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(listings::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(reviews::router())
        .merge(reports::router())
        .merge(vendors::router())
        .merge(admin::router())
        .merge(health::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
