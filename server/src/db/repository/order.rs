//! Order Repository
//!
//! Status changes are conditional updates: `WHERE status = $from` makes a
//! lost race observable as an empty result instead of a silent overwrite.
//! The `pending -> paid` claim is the settlement idempotency guard.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Order, OrderStatus};
use chrono::{DateTime, Utc};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "customer_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("create returned no order".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(parse_id(ORDER_TABLE, id)?).await?;
        Ok(order)
    }

    /// A customer's orders, newest first
    pub async fn find_by_customer(
        &self,
        customer: &RecordId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM customer_order WHERE customer = $customer \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("customer", customer.clone()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders that contain at least one of the vendor's lines, newest first
    pub async fn find_by_vendor(
        &self,
        vendor: &RecordId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM customer_order WHERE $vendor INSIDE lines.vendor \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("vendor", vendor.clone()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_status(&self, status: OrderStatus, limit: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM customer_order WHERE status = $status \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("status", status))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Atomically claim a pending order for settlement.
    ///
    /// Returns the claimed order, or `None` if it was not `PENDING` —
    /// which is exactly the at-most-once guard for stock decrements.
    pub async fn claim_pending(
        &self,
        id: &RecordId,
        confirmation_id: String,
        paid_at: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let claimed: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = $paid, confirmation_id = $cid, paid_at = $at \
                 WHERE status = $pending RETURN AFTER",
            )
            .bind(("order", id.clone()))
            .bind(("paid", OrderStatus::Paid))
            .bind(("pending", OrderStatus::Pending))
            .bind(("cid", confirmation_id))
            .bind(("at", paid_at))
            .await?
            .take(0)?;
        Ok(claimed.into_iter().next())
    }

    /// Conditional forward transition (`ship`, `deliver`).
    ///
    /// `None` means the order was not in `from` when the update ran.
    pub async fn transition(
        &self,
        id: &RecordId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $order SET status = $to WHERE status = $from RETURN AFTER")
            .bind(("order", id.clone()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Cancel from any of `allowed_from`, recording the reason.
    pub async fn cancel(
        &self,
        id: &RecordId,
        allowed_from: Vec<OrderStatus>,
        reason: String,
    ) -> RepoResult<Option<Order>> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = $cancelled, cancel_reason = $reason \
                 WHERE status INSIDE $from RETURN AFTER",
            )
            .bind(("order", id.clone()))
            .bind(("cancelled", OrderStatus::Cancelled))
            .bind(("from", allowed_from))
            .bind(("reason", reason))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }
}
