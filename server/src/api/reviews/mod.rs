//! Review API Module (purchase-gated)

pub mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/product/{product_id}", get(handler::list_for_product))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
