//! Payment Model
//!
//! One payment record per settled order (unique index on `order_ref`).
//! The payout list is computed once at settlement and is immutable
//! afterwards except for per-entry payout status updates.

use super::order::PaymentMode;
use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Settlement status of one vendor payout entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Pending,
    Settled,
}

/// Amount owed to one vendor for their share of a paid order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutEntry {
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    /// Vendor's gross share, minor units
    pub gross: i64,
    /// Platform commission withheld, minor units
    pub commission: i64,
    /// gross - commission
    pub net: i64,
    pub status: PayoutStatus,
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order_ref: RecordId,
    pub mode: PaymentMode,
    /// Gateway payment id; `None` for demo confirmations
    pub gateway_payment_id: Option<String>,
    /// Client-supplied signature that passed verification
    pub gateway_signature: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub payouts: Vec<PayoutEntry>,
    pub created_at: DateTime<Utc>,
}
