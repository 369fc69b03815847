//! Cache Store Module
//!
//! Bounded map of upstream responses with TTL expiration and LRU eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Expiry is lazy: an expired entry is dropped when it is looked up, or in
/// bulk when an insert finds the store full.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Lifetime of every entry, counted from insertion
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Get ==
    /// Returns the value stored under `key` if it has not expired.
    ///
    /// A hit marks the key as most recently used. An expired entry is removed
    /// and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Insert ==
    /// Stores `value` under `key`, replacing any previous value and resetting its TTL.
    ///
    /// When a new key arrives at capacity, expired entries are purged first;
    /// if the store is still full the least recently used entry is evicted.
    /// A store with zero capacity keeps nothing.
    pub fn insert(&mut self, key: String, value: Value) {
        if self.max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.purge_expired();
            while self.entries.len() >= self.max_entries {
                match self.lru.evict_oldest() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
        debug_assert_eq!(self.lru.len(), self.entries.len());
        self.stats.set_total_entries(self.entries.len());
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of physically present entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    const LONG_TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_insert_and_get() {
        let mut store = CacheStore::new(100, LONG_TTL);

        store.insert("key1".to_string(), json!({"v": 1}));

        assert_eq!(store.get("key1"), Some(json!({"v": 1})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100, LONG_TTL);
        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, LONG_TTL);

        store.insert("key1".to_string(), json!(1));
        store.insert("key1".to_string(), json!(2));

        assert_eq!(store.get("key1"), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, Duration::from_millis(50));

        store.insert("key1".to_string(), json!("value1"));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), None);
        assert!(store.is_empty());

        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3, LONG_TTL);

        store.insert("key1".to_string(), json!(1));
        store.insert("key2".to_string(), json!(2));
        store.insert("key3".to_string(), json!(3));
        store.insert("key4".to_string(), json!(4));

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3, LONG_TTL);

        store.insert("key1".to_string(), json!(1));
        store.insert("key2".to_string(), json!(2));
        store.insert("key3".to_string(), json!(3));

        store.get("key1");
        store.insert("key4".to_string(), json!(4));

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2, LONG_TTL);

        store.insert("key1".to_string(), json!(1));
        store.insert("key2".to_string(), json!(2));
        store.insert("key1".to_string(), json!(10));

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.get("key2"), Some(json!(2)));
    }

    #[test]
    fn test_store_purges_expired_before_evicting() {
        let mut store = CacheStore::new(2, Duration::from_millis(50));

        store.insert("stale".to_string(), json!(1));
        sleep(Duration::from_millis(80));
        store.insert("fresh".to_string(), json!(2));

        // "stale" is expired but still present; inserting a third key at
        // capacity drops it instead of evicting "fresh".
        store.insert("newest".to_string(), json!(3));

        let stats = store.stats();
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
        assert!(store.get("fresh").is_some());
        assert!(store.get("newest").is_some());
    }

    #[test]
    fn test_store_zero_capacity_keeps_nothing() {
        let mut store = CacheStore::new(0, LONG_TTL);
        store.insert("key".to_string(), json!(1));
        assert!(store.is_empty());
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = CacheStore::new(100, Duration::from_millis(50));

        store.insert("key1".to_string(), json!(1));
        store.insert("key2".to_string(), json!(2));
        sleep(Duration::from_millis(80));

        assert_eq!(store.purge_expired(), 2);
        assert!(store.is_empty());
        assert_eq!(store.purge_expired(), 0);
    }
}
