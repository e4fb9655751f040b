//! Order pipeline
//!
//! Converts a cart into a pending order, confirms payment (gateway
//! signature or demo call), and settles: flip to paid, commit stock,
//! record vendor payouts, clear the cart, invalidate cached views.
//!
//! The settlement sequence is not one storage transaction. It
//! approximates atomicity with two guards:
//!
//! 1. an atomic `PENDING -> PAID` claim on the order, so a replayed
//!    confirmation can never decrement stock twice;
//! 2. per-line conditional stock decrements that refuse to go negative;
//!    on failure the lines already taken are restored and the order is
//!    cancelled.
//!
//! A payout-write failure after the claim is logged and left to the
//! periodic reconciler — payment and stock state are never rolled back
//! at that point.

mod payouts;

pub use payouts::{COMMISSION_RATE, compute_payouts};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::cart::CartStore;
use crate::db::models::{Order, OrderLine, OrderStatus, Payment, PaymentMode};
use crate::db::repository::{
    ListingRepository, OrderRepository, PaymentRepository, RepoError, parse_id,
};
use crate::payment::PaymentService;
use shared::error::{AppError, ErrorCode};
use std::sync::Arc;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    CartEmpty,

    #[error("listing {0} not found")]
    ListingNotFound(String),

    #[error("listing {0} is not active")]
    ListingInactive(String),

    #[error("insufficient stock for {listing}: requested {requested}, available {available}")]
    OutOfStock {
        listing: String,
        requested: i64,
        available: i64,
    },

    #[error("order not found")]
    OrderNotFound,

    #[error("order is not pending")]
    NotPending,

    #[error("payment mode mismatch")]
    ModeMismatch,

    #[error("payment signature verification failed")]
    SignatureMismatch,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::CartEmpty => AppError::new(ErrorCode::CartEmpty),
            CheckoutError::ListingNotFound(id) => {
                AppError::new(ErrorCode::ListingNotFound).with_detail("listing", id)
            }
            CheckoutError::ListingInactive(id) => {
                AppError::new(ErrorCode::ListingInactive).with_detail("listing", id)
            }
            CheckoutError::OutOfStock {
                listing,
                requested,
                available,
            } => AppError::new(ErrorCode::OutOfStock)
                .with_detail("listing", listing)
                .with_detail("requested", requested)
                .with_detail("available", available),
            CheckoutError::OrderNotFound => AppError::new(ErrorCode::OrderNotFound),
            CheckoutError::NotPending => AppError::new(ErrorCode::OrderNotPending),
            CheckoutError::ModeMismatch => AppError::new(ErrorCode::PaymentModeMismatch),
            CheckoutError::SignatureMismatch => {
                AppError::new(ErrorCode::PaymentVerificationFailed)
            }
            CheckoutError::Repo(RepoError::NotFound(msg)) => AppError::not_found(msg),
            CheckoutError::Repo(e) => AppError::database(e.to_string()),
        }
    }
}

/// Response for order creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub demo_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_key_id: Option<String>,
}

/// Gateway verification payload (field names follow the gateway widget)
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// The order pipeline service
#[derive(Clone)]
pub struct CheckoutService {
    db: Surreal<Db>,
    carts: CartStore,
    cache: ResponseCache,
    payments: Arc<PaymentService>,
}

impl CheckoutService {
    pub fn new(
        db: Surreal<Db>,
        carts: CartStore,
        cache: ResponseCache,
        payments: Arc<PaymentService>,
    ) -> Self {
        Self {
            db,
            carts,
            cache,
            payments,
        }
    }

    /// Create a pending order from the customer's cart.
    ///
    /// Every cart line is re-validated against the live listing here, at
    /// checkout time — stock and price may have moved since the lines
    /// were added. The current price is what gets snapshotted. Stock is
    /// not touched: inventory commits only at confirmed payment.
    pub async fn create_order(
        &self,
        customer: &RecordId,
    ) -> Result<CreateOrderResponse, CheckoutError> {
        let cart = self.carts.lines(&customer.to_string());
        if cart.is_empty() {
            return Err(CheckoutError::CartEmpty);
        }

        let listings = ListingRepository::new(self.db.clone());
        let mut lines = Vec::with_capacity(cart.len());
        let mut total: i64 = 0;

        for item in &cart {
            let listing = listings
                .find_by_id(&item.listing_id)
                .await?
                .ok_or_else(|| CheckoutError::ListingNotFound(item.listing_id.clone()))?;
            if !listing.active {
                return Err(CheckoutError::ListingInactive(item.listing_id.clone()));
            }
            if item.quantity > listing.stock {
                return Err(CheckoutError::OutOfStock {
                    listing: item.listing_id.clone(),
                    requested: item.quantity,
                    available: listing.stock,
                });
            }

            let line_total = listing.price * item.quantity;
            total += line_total;
            lines.push(OrderLine {
                listing: parse_id("listing", &item.listing_id)?,
                product: listing.product.clone(),
                product_name: item.product_name.clone(),
                vendor: listing.vendor.clone(),
                unit_price: listing.price,
                quantity: item.quantity,
                line_total,
            });
        }

        let receipt = Uuid::new_v4().simple().to_string();
        let opened = self.payments.open(total, &receipt).await;
        let demo_mode = opened.mode == PaymentMode::Demo;

        let order = OrderRepository::new(self.db.clone())
            .create(Order {
                id: None,
                customer: customer.clone(),
                lines,
                total_amount: total,
                currency: self.payments.currency().to_string(),
                status: OrderStatus::Pending,
                payment_mode: opened.mode,
                gateway_order_id: opened.order_id.clone(),
                confirmation_id: None,
                paid_at: None,
                cancel_reason: None,
                created_at: Utc::now(),
            })
            .await?;

        let order_id = order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        // the cached first page of my-orders no longer matches
        self.cache.delete(&format!("{}:orders", customer));
        tracing::info!(
            order = %order_id,
            amount = total,
            mode = ?order.payment_mode,
            "Order created"
        );

        Ok(CreateOrderResponse {
            order_id,
            amount: total,
            currency: order.currency,
            demo_mode,
            gateway_order_id: (!demo_mode).then_some(opened.order_id),
            gateway_key_id: (!demo_mode)
                .then(|| self.payments.gateway_key_id().map(str::to_string))
                .flatten(),
        })
    }

    /// Demo confirmation: the authenticated call by the order's owner is
    /// the whole proof of payment.
    pub async fn confirm_demo(
        &self,
        customer: &RecordId,
        order_id: &str,
    ) -> Result<Order, CheckoutError> {
        let order = self.owned_order(customer, order_id).await?;
        if order.payment_mode != PaymentMode::Demo {
            return Err(CheckoutError::ModeMismatch);
        }
        self.settle(order, None, None).await
    }

    /// Gateway confirmation: recompute the HMAC over the gateway order
    /// and payment ids and compare against the client-supplied signature.
    /// A mismatch aborts before any state change, leaving the order
    /// pending and retryable.
    pub async fn verify_gateway(
        &self,
        customer: &RecordId,
        req: VerifyPaymentRequest,
    ) -> Result<Order, CheckoutError> {
        let order = self.owned_order(customer, &req.order_id).await?;
        if order.payment_mode != PaymentMode::Gateway {
            return Err(CheckoutError::ModeMismatch);
        }
        if order.gateway_order_id != req.razorpay_order_id {
            return Err(CheckoutError::SignatureMismatch);
        }
        self.payments
            .verify_signature(
                &req.razorpay_order_id,
                &req.razorpay_payment_id,
                &req.razorpay_signature,
            )
            .map_err(|_| CheckoutError::SignatureMismatch)?;

        self.settle(
            order,
            Some(req.razorpay_payment_id),
            Some(req.razorpay_signature),
        )
        .await
    }

    async fn owned_order(
        &self,
        customer: &RecordId,
        order_id: &str,
    ) -> Result<Order, CheckoutError> {
        let order = OrderRepository::new(self.db.clone())
            .find_by_id(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;
        // someone else's order reads as absent
        if order.customer != *customer {
            return Err(CheckoutError::OrderNotFound);
        }
        Ok(order)
    }

    /// Settlement: claim, commit stock, record payouts, clear cart,
    /// invalidate caches. See the module docs for the atomicity story.
    async fn settle(
        &self,
        order: Order,
        gateway_payment_id: Option<String>,
        gateway_signature: Option<String>,
    ) -> Result<Order, CheckoutError> {
        let order_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("order missing id".into()))?;
        let orders = OrderRepository::new(self.db.clone());
        let listings = ListingRepository::new(self.db.clone());

        // 1. Idempotency claim: only one confirmation wins the flip.
        let claimed = orders
            .claim_pending(&order_id, Uuid::new_v4().to_string(), Utc::now())
            .await?
            .ok_or(CheckoutError::NotPending)?;

        // 2. Conditional stock decrements, compensated on failure.
        let mut taken: Vec<&OrderLine> = Vec::new();
        for line in &claimed.lines {
            if listings.decrement_stock(&line.listing, line.quantity).await? {
                taken.push(line);
                continue;
            }

            for done in taken {
                if let Err(e) = listings.restore_stock(&done.listing, done.quantity).await {
                    tracing::error!(
                        listing = %done.listing,
                        error = %e,
                        "Failed to restore stock while unwinding settlement"
                    );
                }
            }
            let _ = orders
                .cancel(
                    &order_id,
                    vec![OrderStatus::Paid],
                    "insufficient stock at settlement".into(),
                )
                .await;

            let available = listings
                .find_by_id(&line.listing.to_string())
                .await
                .ok()
                .flatten()
                .map(|l| l.stock)
                .unwrap_or(0);
            tracing::warn!(
                order = %order_id,
                listing = %line.listing,
                "Settlement lost the stock race; order cancelled"
            );
            return Err(CheckoutError::OutOfStock {
                listing: line.listing.to_string(),
                requested: line.quantity,
                available,
            });
        }

        // 3. Payout record. Failure is logged, not rolled back — the
        //    reconciler picks up paid orders with no payment record.
        let payment = Payment {
            id: None,
            order_ref: order_id.clone(),
            mode: claimed.payment_mode,
            gateway_payment_id,
            gateway_signature,
            amount: claimed.total_amount,
            currency: claimed.currency.clone(),
            payouts: compute_payouts(&claimed.lines, COMMISSION_RATE),
            created_at: Utc::now(),
        };
        if let Err(e) = PaymentRepository::new(self.db.clone()).create(payment).await {
            tracing::error!(
                order = %order_id,
                error = %e,
                "Payout record failed after payment confirmation; left for reconciliation"
            );
        }

        // 4. The cart served its purpose.
        self.carts.clear(&claimed.customer.to_string());

        // 5. Cached views of the affected listings' product and vendor
        //    pages are stale now.
        self.invalidate_after_settlement(&claimed);

        tracing::info!(
            order = %order_id,
            amount = claimed.total_amount,
            "Order settled"
        );
        Ok(claimed)
    }

    fn invalidate_after_settlement(&self, order: &Order) {
        // list views flush together; detail views are keyed by record id
        self.cache.delete_by_prefix("products:");
        for line in &order.lines {
            self.cache.delete(&line.product.to_string());
            self.cache.delete_by_prefix(&format!("{}:", line.vendor));
        }
        self.cache.delete(&format!("{}:orders", order.customer));
    }

    /// Retry payout computation for paid orders that have no payment
    /// record. The unique payment index makes concurrent retries safe.
    pub async fn reconcile_missing_payouts(&self) -> usize {
        let orders = OrderRepository::new(self.db.clone());
        let payments = PaymentRepository::new(self.db.clone());

        let paid = match orders.find_by_status(OrderStatus::Paid, 200).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Reconciler failed to list paid orders");
                return 0;
            }
        };

        let mut recovered = 0;
        for order in paid {
            let Some(order_id) = order.id.clone() else {
                continue;
            };
            match payments.find_by_order(&order_id).await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(order = %order_id, error = %e, "Reconciler lookup failed");
                    continue;
                }
            }

            // Gateway correlation ids were lost with the original failure;
            // the amounts are what settlement owes the vendors.
            let payment = Payment {
                id: None,
                order_ref: order_id.clone(),
                mode: order.payment_mode,
                gateway_payment_id: None,
                gateway_signature: None,
                amount: order.total_amount,
                currency: order.currency.clone(),
                payouts: compute_payouts(&order.lines, COMMISSION_RATE),
                created_at: Utc::now(),
            };
            match payments.create(payment).await {
                Ok(_) => {
                    tracing::info!(order = %order_id, "Reconciled missing payout record");
                    recovered += 1;
                }
                Err(RepoError::Duplicate(_)) => {}
                Err(e) => {
                    tracing::error!(order = %order_id, error = %e, "Reconciler write failed");
                }
            }
        }
        recovered
    }
}
