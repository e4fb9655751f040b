//! Response cache
//!
//! A process-local TTL key-value cache fronting read endpoints. Writes
//! invalidate explicitly: whole families by prefix, single views by exact
//! key. The cache is injected into the components that need invalidation;
//! there is no global singleton. In a multi-process deployment each process
//! holds its own instance and staleness is bounded by the entry TTL.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// TTL'd response cache
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl,
        }
    }

    /// Look up a key. Expired entries answer as misses immediately and are
    /// dropped on contact; the sweeper only reclaims what nobody touches.
    pub fn get(&self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store a value under the default TTL
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop one exact key
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop every key starting with `prefix`; returns how many went
    pub fn delete_by_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    /// Drop everything
    pub fn flush(&self) {
        self.entries.clear();
    }

    /// Evict expired entries; returns how many were reclaimed
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_set_round_trip() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("product:1", json!({"name": "Widget"}));
        assert_eq!(cache.get("product:1"), Some(json!({"name": "Widget"})));
        assert_eq!(cache.get("product:2"), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        cache.set("k", json!(1));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), None);
        // the miss also removed it
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_delete_by_prefix_is_exact() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("products:all", json!(1));
        cache.set("products:tools", json!(2));
        cache.set("product:1", json!(3));

        let removed = cache.delete_by_prefix("products:");
        assert_eq!(removed, 2);
        assert_eq!(cache.get("product:1"), Some(json!(3)));
    }

    #[test]
    fn test_sweep_reclaims_only_expired() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set_with_ttl("short", json!(1), Duration::from_millis(10));
        cache.set("long", json!(2));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.get("long"), Some(json!(2)));
    }

    #[test]
    fn test_flush() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.flush();
        assert!(cache.is_empty());
    }
}
