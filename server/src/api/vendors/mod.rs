//! Vendor API Module (store profiles, dashboard, payouts)

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendors", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_profile))
        .route("/me", get(handler::my_profile).put(handler::update_profile))
        .route("/me/dashboard", get(handler::dashboard))
        .route("/me/payouts", get(handler::my_payouts))
        .route("/{id}", get(handler::public_profile))
}
