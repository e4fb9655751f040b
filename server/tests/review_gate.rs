//! Review gate tests: proof of purchase, the unique (user, order,
//! product) constraint, and author-only edits.

mod common;

use bazaar_server::db::models::{Review, UserRole};
use bazaar_server::db::repository::{RepoError, ReviewRepository};
use chrono::Utc;
use common::*;
use surrealdb::RecordId;

async fn paid_order(
    state: &bazaar_server::core::ServerState,
    customer: &RecordId,
    listing: &bazaar_server::db::models::Listing,
    qty: i64,
) -> bazaar_server::db::models::Order {
    fill_cart(state, customer, listing, qty);
    let checkout = state.checkout();
    let created = checkout.create_order(customer).await.unwrap();
    checkout.confirm_demo(customer, &created.order_id).await.unwrap()
}

fn review_for(
    customer: &RecordId,
    order: &bazaar_server::db::models::Order,
    rating: i64,
) -> Review {
    let line = &order.lines[0];
    Review {
        id: None,
        user: customer.clone(),
        order_ref: order.id.clone().unwrap(),
        product: line.product.clone(),
        vendor: line.vendor.clone(),
        listing: line.listing.clone(),
        rating,
        comment: Some("solid widget".into()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn one_review_per_purchase() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    let order = paid_order(&state, &customer, &listing, 1).await;

    let repo = ReviewRepository::new(state.db.clone());
    repo.create(review_for(&customer, &order, 5))
        .await
        .expect("first review");

    // identical (user, order, product) key dies on the unique index
    let err = repo
        .create(review_for(&customer, &order, 1))
        .await
        .expect_err("duplicate review");
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn separate_orders_allow_separate_reviews() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    let first = paid_order(&state, &customer, &listing, 1).await;
    let second = paid_order(&state, &customer, &listing, 1).await;

    let repo = ReviewRepository::new(state.db.clone());
    repo.create(review_for(&customer, &first, 5)).await.unwrap();
    repo.create(review_for(&customer, &second, 3))
        .await
        .expect("different order, different review");

    let stats = repo
        .stats_for_product(&first.lines[0].product)
        .await
        .unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.mean, Some(4.0));
}

#[tokio::test]
async fn vendor_rating_aggregates_across_products() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product_a = seed_product(&state, "Widget").await;
    let product_b = seed_product(&state, "Gadget").await;
    let listing_a = seed_listing(&state, &vendor, &product_a, 100, 5).await;
    let listing_b = seed_listing(&state, &vendor, &product_b, 200, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    let order_a = paid_order(&state, &customer, &listing_a, 1).await;
    let order_b = paid_order(&state, &customer, &listing_b, 1).await;

    let repo = ReviewRepository::new(state.db.clone());
    repo.create(review_for(&customer, &order_a, 4)).await.unwrap();
    repo.create(review_for(&customer, &order_b, 2)).await.unwrap();

    let stats = repo.stats_for_vendor(&vendor).await.unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.mean, Some(3.0));
}
