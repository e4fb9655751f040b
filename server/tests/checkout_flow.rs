//! End-to-end checkout pipeline tests over an in-memory database:
//! create-order validation, demo settlement, idempotency, the oversell
//! race, signature verification and payout reconciliation.

mod common;

use bazaar_server::checkout::{CheckoutError, VerifyPaymentRequest};
use bazaar_server::db::models::{
    ListingUpdate, Order, OrderStatus, PaymentMode, UserRole,
};
use bazaar_server::db::repository::{ListingRepository, OrderRepository, PaymentRepository};
use chrono::Utc;
use common::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;

#[tokio::test]
async fn demo_checkout_settles_order() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    fill_cart(&state, &customer, &listing, 2);

    let checkout = state.checkout();
    let created = checkout.create_order(&customer).await.expect("create order");
    assert!(created.demo_mode);
    assert_eq!(created.amount, 200);
    assert_eq!(created.currency, "INR");

    let order = checkout
        .confirm_demo(&customer, &created.order_id)
        .await
        .expect("demo checkout");
    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.paid_at.is_some());
    assert!(order.confirmation_id.is_some());

    // stock committed exactly once
    let listing_after = fetch_listing(&state, listing.id.as_ref().unwrap()).await;
    assert_eq!(listing_after.stock, 3);

    // payout record: gross 200, commission 2 (1%), net 198
    let payment = PaymentRepository::new(state.db.clone())
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .expect("payment recorded");
    assert_eq!(payment.amount, 200);
    assert_eq!(payment.payouts.len(), 1);
    assert_eq!(payment.payouts[0].vendor, vendor);
    assert_eq!(payment.payouts[0].gross, 200);
    assert_eq!(payment.payouts[0].commission, 2);
    assert_eq!(payment.payouts[0].net, 198);

    // cart cleared by settlement
    assert!(state.carts.lines(&customer.to_string()).is_empty());
}

#[tokio::test]
async fn replayed_confirmation_decrements_nothing() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    fill_cart(&state, &customer, &listing, 2);
    let checkout = state.checkout();
    let created = checkout.create_order(&customer).await.unwrap();
    checkout
        .confirm_demo(&customer, &created.order_id)
        .await
        .unwrap();

    // second confirmation bounces off the pending->paid claim
    let err = checkout
        .confirm_demo(&customer, &created.order_id)
        .await
        .expect_err("replay must fail");
    assert!(matches!(err, CheckoutError::NotPending));

    let listing_after = fetch_listing(&state, listing.id.as_ref().unwrap()).await;
    assert_eq!(listing_after.stock, 3);
}

#[tokio::test]
async fn oversell_is_rejected_before_any_order_persists() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 1).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    fill_cart(&state, &customer, &listing, 3);

    let err = state
        .checkout()
        .create_order(&customer)
        .await
        .expect_err("insufficient stock");
    assert!(matches!(err, CheckoutError::OutOfStock { requested: 3, available: 1, .. }));

    // no partial order
    let orders = OrderRepository::new(state.db.clone())
        .find_by_customer(&customer, 10, 0)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn order_total_is_a_snapshot() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    fill_cart(&state, &customer, &listing, 2);
    let checkout = state.checkout();
    let created = checkout.create_order(&customer).await.unwrap();

    // the vendor reprices while the order is pending
    ListingRepository::new(state.db.clone())
        .update(
            &listing.id.as_ref().unwrap().to_string(),
            ListingUpdate {
                price: Some(999),
                stock: None,
                active: None,
            },
        )
        .await
        .unwrap();

    let order = checkout
        .confirm_demo(&customer, &created.order_id)
        .await
        .unwrap();
    assert_eq!(order.total_amount, 200);
    assert_eq!(order.lines[0].unit_price, 100);

    // payouts follow the snapshot too
    let payment = PaymentRepository::new(state.db.clone())
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.payouts[0].gross, 200);
}

#[tokio::test]
async fn concurrent_settlements_cannot_oversell() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 4).await;

    // both checkouts pass validation against stock 4 before either settles
    let alice = seed_user(&state, "alice@example.com", UserRole::Customer).await;
    let bob = seed_user(&state, "bob@example.com", UserRole::Customer).await;
    fill_cart(&state, &alice, &listing, 3);
    fill_cart(&state, &bob, &listing, 3);

    let checkout = state.checkout();
    let order_a = checkout.create_order(&alice).await.unwrap();
    let order_b = checkout.create_order(&bob).await.unwrap();

    let first = checkout.confirm_demo(&alice, &order_a.order_id).await;
    let second = checkout.confirm_demo(&bob, &order_b.order_id).await;

    assert!(first.is_ok());
    let err = second.expect_err("second settlement must lose the stock race");
    assert!(matches!(err, CheckoutError::OutOfStock { .. }));

    // never negative, and the loser's order is cancelled
    let listing_after = fetch_listing(&state, listing.id.as_ref().unwrap()).await;
    assert_eq!(listing_after.stock, 1);

    let lost = OrderRepository::new(state.db.clone())
        .find_by_id(&order_b.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lost.status, OrderStatus::Cancelled);
}

/// Seed a pending gateway-mode order directly (no network involved)
async fn seed_gateway_order(
    state: &bazaar_server::core::ServerState,
    customer: &surrealdb::RecordId,
    listing: &bazaar_server::db::models::Listing,
    qty: i64,
) -> Order {
    use bazaar_server::db::models::OrderLine;
    OrderRepository::new(state.db.clone())
        .create(Order {
            id: None,
            customer: customer.clone(),
            lines: vec![OrderLine {
                listing: listing.id.clone().unwrap(),
                product: listing.product.clone(),
                product_name: "Widget".into(),
                vendor: listing.vendor.clone(),
                unit_price: listing.price,
                quantity: qty,
                line_total: listing.price * qty,
            }],
            total_amount: listing.price * qty,
            currency: "INR".into(),
            status: OrderStatus::Pending,
            payment_mode: PaymentMode::Gateway,
            gateway_order_id: "gw_order_1".into(),
            confirmation_id: None,
            paid_at: None,
            cancel_reason: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[tokio::test]
async fn bad_signature_leaves_order_pending() {
    let state = test_state_with_gateway("gw_secret").await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    let order = seed_gateway_order(&state, &customer, &listing, 2).await;
    let order_id = order.id.as_ref().unwrap().to_string();

    let err = state
        .checkout()
        .verify_gateway(
            &customer,
            VerifyPaymentRequest {
                order_id: order_id.clone(),
                razorpay_order_id: "gw_order_1".into(),
                razorpay_payment_id: "gw_pay_1".into(),
                razorpay_signature: sign("wrong_secret", "gw_order_1", "gw_pay_1"),
            },
        )
        .await
        .expect_err("bad signature");
    assert!(matches!(err, CheckoutError::SignatureMismatch));

    // nothing moved
    let order_after = OrderRepository::new(state.db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order_after.status, OrderStatus::Pending);
    let listing_after = fetch_listing(&state, listing.id.as_ref().unwrap()).await;
    assert_eq!(listing_after.stock, 5);
}

#[tokio::test]
async fn valid_signature_settles_gateway_order() {
    let state = test_state_with_gateway("gw_secret").await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 100, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    let order = seed_gateway_order(&state, &customer, &listing, 2).await;
    let order_id = order.id.as_ref().unwrap().to_string();

    let settled = state
        .checkout()
        .verify_gateway(
            &customer,
            VerifyPaymentRequest {
                order_id: order_id.clone(),
                razorpay_order_id: "gw_order_1".into(),
                razorpay_payment_id: "gw_pay_1".into(),
                razorpay_signature: sign("gw_secret", "gw_order_1", "gw_pay_1"),
            },
        )
        .await
        .expect("valid signature settles");
    assert_eq!(settled.status, OrderStatus::Paid);

    let payment = PaymentRepository::new(state.db.clone())
        .find_by_order(settled.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.gateway_payment_id.as_deref(), Some("gw_pay_1"));

    let listing_after = fetch_listing(&state, listing.id.as_ref().unwrap()).await;
    assert_eq!(listing_after.stock, 3);
}

#[tokio::test]
async fn reconciler_backfills_missing_payout_records() {
    let state = test_state().await;
    let vendor = seed_vendor(&state, "v@example.com", "Acme").await;
    let product = seed_product(&state, "Widget").await;
    let listing = seed_listing(&state, &vendor, &product, 150, 5).await;
    let customer = seed_user(&state, "c@example.com", UserRole::Customer).await;

    // a paid order whose payout write never happened
    let mut order = seed_gateway_order(&state, &customer, &listing, 1).await;
    order = OrderRepository::new(state.db.clone())
        .claim_pending(
            order.id.as_ref().unwrap(),
            "conf-1".into(),
            Utc::now(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);

    let recovered = state.checkout().reconcile_missing_payouts().await;
    assert_eq!(recovered, 1);

    let payment = PaymentRepository::new(state.db.clone())
        .find_by_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .expect("payout record backfilled");
    // 1% of 150 rounds half-up to 2
    assert_eq!(payment.payouts[0].gross, 150);
    assert_eq!(payment.payouts[0].commission, 2);
    assert_eq!(payment.payouts[0].net, 148);

    // a second pass finds nothing to do
    assert_eq!(state.checkout().reconcile_missing_payouts().await, 0);
}
