//! Listing Model
//!
//! A listing is one vendor's priced, stocked offer of a catalog product.
//! Stock is authoritative inventory; it is only ever decremented through
//! the checkout settlement step, via conditional updates that keep it
//! non-negative.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Listing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    /// Unit price in minor units; positive while active
    pub price: i64,
    /// Units available; never negative
    pub stock: i64,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create listing payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingCreate {
    /// Catalog product id ("product:xyz")
    pub product_id: String,
    #[validate(range(min = 1))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub stock: i64,
}

/// Update listing payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingUpdate {
    #[validate(range(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
