//! Session carts
//!
//! Carts are ephemeral per-user state: an ordered list of listing
//! snapshots, held in process memory and dropped when a session goes
//! idle. They are never persisted — the durable record of intent is the
//! order, created at checkout.
//!
//! Lines snapshot the listing's price, vendor and product name at
//! add-to-cart time; checkout re-validates against the live listing.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One cart line: a listing snapshot plus a quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub listing_id: String,
    pub product_id: String,
    pub product_name: String,
    pub vendor_id: String,
    /// Unit price in minor units at add time (display only; checkout
    /// re-reads the live price)
    pub unit_price: i64,
    pub quantity: i64,
}

#[derive(Debug)]
struct CartEntry {
    lines: Vec<CartLine>,
    touched_at: Instant,
}

/// Per-user cart store
#[derive(Debug, Clone)]
pub struct CartStore {
    carts: Arc<DashMap<String, CartEntry>>,
    idle_ttl: Duration,
}

impl CartStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            carts: Arc::new(DashMap::new()),
            idle_ttl,
        }
    }

    /// Snapshot of the user's cart lines (empty if no cart)
    pub fn lines(&self, user: &str) -> Vec<CartLine> {
        self.carts
            .get(user)
            .map(|entry| entry.lines.clone())
            .unwrap_or_default()
    }

    /// Add a line. Re-adding the same listing merges into the existing
    /// line by increasing its quantity, keeping the cart unique per
    /// listing.
    pub fn add(&self, user: &str, line: CartLine) {
        let mut entry = self.carts.entry(user.to_string()).or_insert_with(|| CartEntry {
            lines: Vec::new(),
            touched_at: Instant::now(),
        });
        entry.touched_at = Instant::now();
        match entry
            .lines
            .iter_mut()
            .find(|l| l.listing_id == line.listing_id)
        {
            Some(existing) => existing.quantity += line.quantity,
            None => entry.lines.push(line),
        }
    }

    /// Set a line's quantity; zero or less removes the line.
    /// Returns `false` if the line does not exist.
    pub fn set_quantity(&self, user: &str, listing_id: &str, quantity: i64) -> bool {
        let Some(mut entry) = self.carts.get_mut(user) else {
            return false;
        };
        entry.touched_at = Instant::now();
        if quantity <= 0 {
            let before = entry.lines.len();
            entry.lines.retain(|l| l.listing_id != listing_id);
            return entry.lines.len() < before;
        }
        match entry.lines.iter_mut().find(|l| l.listing_id == listing_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line; returns `false` if it was not there
    pub fn remove(&self, user: &str, listing_id: &str) -> bool {
        self.set_quantity(user, listing_id, 0)
    }

    pub fn clear(&self, user: &str) {
        self.carts.remove(user);
    }

    /// Drop carts idle beyond the session TTL; returns how many went
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.carts.len();
        self.carts
            .retain(|_, entry| now.duration_since(entry.touched_at) < self.idle_ttl);
        before - self.carts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(listing: &str, qty: i64, price: i64) -> CartLine {
        CartLine {
            listing_id: listing.to_string(),
            product_id: "product:p1".to_string(),
            product_name: "Widget".to_string(),
            vendor_id: "vendor:v1".to_string(),
            unit_price: price,
            quantity: qty,
        }
    }

    #[test]
    fn test_re_adding_merges_quantity() {
        let store = CartStore::new(Duration::from_secs(60));
        store.add("user:a", line("listing:1", 2, 100));
        store.add("user:a", line("listing:1", 3, 100));

        let lines = store.lines("user:a");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let store = CartStore::new(Duration::from_secs(60));
        store.add("user:a", line("listing:1", 1, 100));
        store.add("user:a", line("listing:2", 1, 200));
        store.add("user:a", line("listing:1", 1, 100));

        let lines = store.lines("user:a");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].listing_id, "listing:1");
        assert_eq!(lines[1].listing_id, "listing:2");
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let store = CartStore::new(Duration::from_secs(60));
        store.add("user:a", line("listing:1", 2, 100));

        assert!(store.set_quantity("user:a", "listing:1", 7));
        assert_eq!(store.lines("user:a")[0].quantity, 7);

        assert!(!store.set_quantity("user:a", "listing:9", 1));

        assert!(store.remove("user:a", "listing:1"));
        assert!(store.lines("user:a").is_empty());
    }

    #[test]
    fn test_snapshot_price_does_not_follow_updates() {
        let store = CartStore::new(Duration::from_secs(60));
        store.add("user:a", line("listing:1", 1, 100));
        // a later add of the same listing merges quantity but the snapshot
        // taken at first add wins for the line
        store.add("user:a", line("listing:1", 1, 150));
        let lines = store.lines("user:a");
        assert_eq!(lines[0].unit_price, 100);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_sweep_drops_idle_carts() {
        let store = CartStore::new(Duration::from_millis(10));
        store.add("user:a", line("listing:1", 1, 100));
        std::thread::sleep(Duration::from_millis(20));
        store.add("user:b", line("listing:2", 1, 100));

        assert_eq!(store.sweep_idle(), 1);
        assert!(store.lines("user:a").is_empty());
        assert_eq!(store.lines("user:b").len(), 1);
    }
}
