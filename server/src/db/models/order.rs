//! Order Model
//!
//! Order lines are value snapshots captured at checkout time: changing a
//! listing's price afterwards must not alter historical orders.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order lifecycle status.
///
/// Transitions are forward-only: `PENDING -> PAID -> SHIPPED -> DELIVERED`,
/// with a side exit to `CANCELLED` from `PENDING` or `PAID`. Once paid, an
/// order can never return to `PENDING`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Paid, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Paid, Cancelled)
        )
    }
}

/// How an order gets confirmed: through the external gateway, or the
/// demo path used when the gateway is unconfigured or unavailable.
/// Recorded on the order at creation time so verification dispatches to
/// the right path without re-deriving the mode from configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Gateway,
    Demo,
}

/// Immutable snapshot of one purchased listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub listing: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub product_name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    /// Unit price in minor units at checkout time
    pub unit_price: i64,
    pub quantity: i64,
    pub line_total: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    pub lines: Vec<OrderLine>,
    /// Sum of line totals, minor units
    pub total_amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub payment_mode: PaymentMode,
    /// Gateway order id, or the locally generated id in demo mode
    pub gateway_order_id: String,
    /// Set exactly once, by the settlement claim
    pub confirmation_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancellation_exits() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!OrderStatus::Paid.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Shipped));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }
}
