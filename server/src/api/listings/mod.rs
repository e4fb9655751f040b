//! Listing API Module (vendor offers)

pub mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/listings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/mine", get(handler::my_listings))
        .route("/product/{product_id}", get(handler::list_for_product))
        .route("/{id}", put(handler::update))
}
