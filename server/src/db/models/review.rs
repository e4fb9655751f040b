//! Review Model
//!
//! Uniquely keyed by (user, order_ref, product) through a unique index,
//! so concurrent duplicate submissions fail at the storage layer.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub order_ref: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub listing: RecordId,
    /// 1..=5
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create review payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    pub order_id: String,
    pub product_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Update review payload (author only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[validate(range(min = 1, max = 5))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
