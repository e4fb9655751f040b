//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Payment, PayoutStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PAYMENT_TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a payment. The unique `order_ref` index makes a concurrent
    /// reconciler retry fail as `Duplicate` instead of double-recording.
    pub async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let created: Option<Payment> = self
            .base
            .db()
            .create(PAYMENT_TABLE)
            .content(payment)
            .await?;
        created.ok_or_else(|| RepoError::Database("create returned no payment".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Payment>> {
        let payment: Option<Payment> = self.base.db().select(parse_id(PAYMENT_TABLE, id)?).await?;
        Ok(payment)
    }

    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Option<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE order_ref = $order")
            .bind(("order", order.clone()))
            .await?
            .take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Payments that owe the vendor something, newest first
    pub async fn find_by_vendor(
        &self,
        vendor: &RecordId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query(
                "SELECT * FROM payment WHERE $vendor INSIDE payouts.vendor \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("vendor", vendor.clone()))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Flip one vendor's payout entry on a payment (admin settlement).
    ///
    /// Read-modify-write: the payout list itself is immutable, only the
    /// per-entry status moves.
    pub async fn set_payout_status(
        &self,
        payment_id: &str,
        vendor: &RecordId,
        status: PayoutStatus,
    ) -> RepoResult<Payment> {
        let mut payment = self
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("payment {}", payment_id)))?;

        let mut touched = false;
        for entry in &mut payment.payouts {
            if entry.vendor == *vendor {
                entry.status = status;
                touched = true;
            }
        }
        if !touched {
            return Err(RepoError::NotFound(format!(
                "payout entry for {} on payment {}",
                vendor, payment_id
            )));
        }

        let payouts = payment.payouts.clone();
        let updated: Option<Payment> = self
            .base
            .db()
            .update(parse_id(PAYMENT_TABLE, payment_id)?)
            .merge(serde_json::json!({
                "payouts": serde_json::to_value(&payouts)
                    .map_err(|e| RepoError::Database(e.to_string()))?
            }))
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("payment {}", payment_id)))
    }
}
