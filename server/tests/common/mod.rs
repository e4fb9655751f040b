//! Shared test fixtures: in-memory state and seed data
#![allow(dead_code)]

use bazaar_server::cart::CartLine;
use bazaar_server::core::{Config, ServerState};
use bazaar_server::db::models::{Listing, ProductCreate, UserRole, VendorCreate};
use bazaar_server::db::repository::{
    ListingRepository, ProductRepository, UserRepository, VendorRepository,
};
use chrono::Utc;
use surrealdb::RecordId;

pub fn test_config() -> Config {
    Config {
        work_dir: "/tmp/bazaar-test-unused".into(),
        http_port: 0,
        environment: "development".into(),
        jwt_secret: "test-secret".into(),
        token_ttl_hours: 1,
        gateway_url: "https://gateway.invalid/v1".into(),
        gateway_key_id: None,
        gateway_key_secret: None,
        currency: "INR".into(),
        cache_ttl_secs: 60,
        cart_ttl_secs: 3600,
    }
}

/// Fresh in-memory state, demo-only payments
pub async fn test_state() -> ServerState {
    ServerState::initialize_in_memory(&test_config())
        .await
        .expect("in-memory state")
}

/// Fresh in-memory state with gateway credentials configured
pub async fn test_state_with_gateway(key_secret: &str) -> ServerState {
    let mut config = test_config();
    config.gateway_key_id = Some("key_test".into());
    config.gateway_key_secret = Some(key_secret.into());
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

pub async fn seed_user(state: &ServerState, email: &str, role: UserRole) -> RecordId {
    let user = UserRepository::new(state.db.clone())
        .create(
            email.into(),
            "Test User".into(),
            "unused-hash".into(),
            role,
        )
        .await
        .expect("seed user");
    user.id.expect("user id")
}

/// Verified vendor profile owned by a fresh vendor user
pub async fn seed_vendor(state: &ServerState, email: &str, store_name: &str) -> RecordId {
    let user = seed_user(state, email, UserRole::Vendor).await;
    let vendor = VendorRepository::new(state.db.clone())
        .create(
            user,
            VendorCreate {
                store_name: store_name.into(),
                description: None,
            },
        )
        .await
        .expect("seed vendor");
    let vendor_id = vendor.id.expect("vendor id");
    VendorRepository::new(state.db.clone())
        .set_verified(&vendor_id.to_string(), true)
        .await
        .expect("verify vendor");
    vendor_id
}

pub async fn seed_product(state: &ServerState, name: &str) -> RecordId {
    let product = ProductRepository::new(state.db.clone())
        .create(ProductCreate {
            name: name.into(),
            category: "tools".into(),
            description: None,
        })
        .await
        .expect("seed product");
    product.id.expect("product id")
}

pub async fn seed_listing(
    state: &ServerState,
    vendor: &RecordId,
    product: &RecordId,
    price: i64,
    stock: i64,
) -> Listing {
    ListingRepository::new(state.db.clone())
        .create(Listing {
            id: None,
            product: product.clone(),
            vendor: vendor.clone(),
            price,
            stock,
            active: true,
            created_at: Utc::now(),
        })
        .await
        .expect("seed listing")
}

/// Put `qty` of a listing into a customer's cart
pub fn fill_cart(state: &ServerState, customer: &RecordId, listing: &Listing, qty: i64) {
    state.carts.add(
        &customer.to_string(),
        CartLine {
            listing_id: listing.id.clone().expect("listing id").to_string(),
            product_id: listing.product.to_string(),
            product_name: "Widget".into(),
            vendor_id: listing.vendor.to_string(),
            unit_price: listing.price,
            quantity: qty,
        },
    );
}

pub async fn fetch_listing(state: &ServerState, id: &RecordId) -> Listing {
    ListingRepository::new(state.db.clone())
        .find_by_id(&id.to_string())
        .await
        .expect("fetch listing")
        .expect("listing exists")
}
