//! Order API Module (the checkout pipeline surface)

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Checkout pipeline
        .route("/create-order", post(handler::create_order))
        .route("/demo-checkout", post(handler::demo_checkout))
        .route("/verify-payment", post(handler::verify_payment))
        // Reads
        .route("/my-orders", get(handler::my_orders))
        .route("/vendor/my-orders", get(handler::vendor_orders))
        .route("/{id}", get(handler::get_by_id))
        // Fulfilment transitions
        .route("/{id}/ship", post(handler::ship))
        .route("/{id}/deliver", post(handler::deliver))
        .route("/{id}/cancel", post(handler::cancel))
}
