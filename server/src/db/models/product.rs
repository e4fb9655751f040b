//! Product Model (master catalog)

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Catalog product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 80))]
    pub category: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(length(max = 4000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
