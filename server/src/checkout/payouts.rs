//! Vendor payout computation
//!
//! Pure function over order lines, kept separate from the settlement
//! sequence so it is independently testable. Grouping preserves the
//! order vendors first appear in the line list.
//!
//! Commission math runs in `Decimal` and rounds half-up to the cent;
//! net is derived as gross minus commission so each entry reconstructs
//! its gross exactly.

use rust_decimal::Decimal;
use shared::money;

use crate::db::models::{OrderLine, PayoutEntry, PayoutStatus};

/// Platform commission withheld from each vendor's gross: 1%
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Group `lines` by vendor and compute each vendor's payout entry.
pub fn compute_payouts(lines: &[OrderLine], commission_rate: Decimal) -> Vec<PayoutEntry> {
    let mut entries: Vec<PayoutEntry> = Vec::new();

    for line in lines {
        match entries.iter_mut().find(|e| e.vendor == line.vendor) {
            Some(entry) => entry.gross += line.line_total,
            None => entries.push(PayoutEntry {
                vendor: line.vendor.clone(),
                gross: line.line_total,
                commission: 0,
                net: 0,
                status: PayoutStatus::Pending,
            }),
        }
    }

    for entry in &mut entries {
        entry.commission = money::apply_rate(entry.gross, commission_rate);
        entry.net = entry.gross - entry.commission;
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn line(vendor: &str, unit_price: i64, quantity: i64) -> OrderLine {
        OrderLine {
            listing: RecordId::from_table_key("listing", format!("l-{vendor}-{unit_price}")),
            product: RecordId::from_table_key("product", "p1"),
            product_name: "Widget".to_string(),
            vendor: RecordId::from_table_key("vendor", vendor),
            unit_price,
            quantity,
            line_total: unit_price * quantity,
        }
    }

    #[test]
    fn test_single_vendor_scenario() {
        // qty 2 @ 100 -> gross 200, commission 2, net 198
        let payouts = compute_payouts(&[line("a", 100, 2)], COMMISSION_RATE);
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].gross, 200);
        assert_eq!(payouts[0].commission, 2);
        assert_eq!(payouts[0].net, 198);
        assert_eq!(payouts[0].status, PayoutStatus::Pending);
    }

    #[test]
    fn test_groups_by_vendor_preserving_order() {
        let payouts = compute_payouts(
            &[
                line("a", 100, 1),
                line("b", 500, 2),
                line("a", 300, 1),
            ],
            COMMISSION_RATE,
        );
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts[0].vendor.to_string(), "vendor:a");
        assert_eq!(payouts[0].gross, 400);
        assert_eq!(payouts[1].vendor.to_string(), "vendor:b");
        assert_eq!(payouts[1].gross, 1000);
    }

    #[test]
    fn test_commission_rounds_half_up() {
        // gross 150 -> 1% = 1.5 cents -> commission 2, net 148
        let payouts = compute_payouts(&[line("a", 150, 1)], COMMISSION_RATE);
        assert_eq!(payouts[0].commission, 2);
        assert_eq!(payouts[0].net, 148);

        // gross 149 -> 1.49 cents -> commission 1, net 148
        let payouts = compute_payouts(&[line("a", 149, 1)], COMMISSION_RATE);
        assert_eq!(payouts[0].commission, 1);
        assert_eq!(payouts[0].net, 148);
    }

    #[test]
    fn test_net_plus_commission_reconstructs_gross() {
        let lines = [
            line("a", 33, 3),
            line("b", 777, 2),
            line("c", 149, 1),
            line("a", 1, 1),
        ];
        let payouts = compute_payouts(&lines, COMMISSION_RATE);
        let total: i64 = lines.iter().map(|l| l.line_total).sum();

        for entry in &payouts {
            assert_eq!(entry.net + entry.commission, entry.gross);
        }
        let gross_sum: i64 = payouts.iter().map(|e| e.gross).sum();
        assert_eq!(gross_sum, total);
    }

    #[test]
    fn test_empty_lines_yield_no_entries() {
        assert!(compute_payouts(&[], COMMISSION_RATE).is_empty());
    }
}
