//! Vendor Model
//!
//! A vendor is the store profile attached to a user account. Listing
//! creation is gated on `verified`, which only admins can set.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Vendor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user account
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub store_name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Create vendor profile payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorCreate {
    #[validate(length(min = 1, max = 120))]
    pub store_name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Update vendor profile payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VendorUpdate {
    #[validate(length(min = 1, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
