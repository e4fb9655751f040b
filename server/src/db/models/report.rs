//! Report Model (vendor complaints for admin moderation)

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Report entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub reporter: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub listing: Option<RecordId>,
    pub reason: String,
    pub details: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub handled: bool,
    /// Admin's free-text note, set when the report is resolved
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create report payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportCreate {
    pub vendor_id: String,
    pub listing_id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    #[validate(length(max = 4000))]
    pub details: Option<String>,
}

/// Resolve report payload (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportResolve {
    #[validate(length(max = 4000))]
    pub resolution: Option<String>,
}
