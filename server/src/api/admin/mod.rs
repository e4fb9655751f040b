//! Admin API Module (moderation and catalog management)

pub mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Vendor verification
        .route("/vendors/{id}/verify", post(handler::verify_vendor))
        // Reports
        .route("/reports", get(handler::list_reports))
        .route("/reports/{id}/resolve", post(handler::resolve_report))
        // Catalog
        .route("/products", post(handler::create_product))
        .route("/products/{id}", put(handler::update_product))
        // Payout settlement
        .route(
            "/payouts/{payment_id}/{vendor_id}/settle",
            post(handler::settle_payout),
        )
}
