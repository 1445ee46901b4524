//! Cache Store Module
//!
//! Synchronous cache engine: HashMap storage with per-entry TTL expiration
//! and pattern-based bulk invalidation.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, KeyPattern};
use crate::error::{AppError, Result};

// == Cache Store ==
/// Key-value storage where every entry carries its own expiry.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// TTL applied when a caller does not pass one
    default_ttl: Duration,
    hits: u64,
    misses: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            hits: 0,
            misses: 0,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting any entry and resetting expiry.
    ///
    /// A zero TTL stores nothing and drops any existing entry, since the value
    /// would never be visible.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) -> Result<()> {
        if key.is_empty() {
            return Err(AppError::InvalidRequest("Key cannot be empty".to_string()));
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            self.entries.remove(&key);
            return Ok(());
        }

        self.entries
            .insert(key, CacheEntry::new(value, ttl, Instant::now()));
        Ok(())
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns true if one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every entry whose key matches `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&mut self, pattern: &KeyPattern) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        before - self.entries.len()
    }

    // == Clear ==
    /// Removes all entries. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Stats ==
    /// Returns a snapshot of the live entries and hit counters.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();

        CacheStats {
            size: keys.len(),
            keys,
            hits: self.hits,
            misses: self.misses,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired or not.
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

    const TTL: Duration = Duration::from_secs(300);

    fn store() -> CacheStore<String> {
        CacheStore::new(TTL)
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store();

        store.set("blog:post:a".to_string(), "A".to_string(), None).unwrap();
        assert_eq!(store.get("blog:post:a").as_deref(), Some("A"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store();
        assert!(store.get("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_empty_key_rejected() {
        let mut store = store();
        let result = store.set(String::new(), "v".to_string(), None);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store();

        store.set("k".to_string(), "v1".to_string(), None).unwrap();
        store.set("k".to_string(), "v2".to_string(), None).unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_zero_ttl_drops_entry() {
        let mut store = store();

        store.set("k".to_string(), "v1".to_string(), None).unwrap();
        store.set("k".to_string(), "v2".to_string(), Some(Duration::ZERO)).unwrap();

        assert!(store.is_empty());
        assert!(store.get("k").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let mut store = store();
        store.set("k".to_string(), "v".to_string(), Some(Duration::from_secs(1))).unwrap();

        assert!(store.get("k").is_some());

        tokio::time::advance(Duration::from_millis(1000)).await;

        // Expired entries are removed on read
        assert!(store.get("k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = store();
        store.set("k".to_string(), "v".to_string(), None).unwrap();

        assert!(store.invalidate("k"));
        assert!(!store.invalidate("k"));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_store_invalidate_pattern() {
        let mut store = store();
        for key in ["blog:post:a", "blog:post:b", "case-study:a"] {
            store.set(key.to_string(), key.to_uppercase(), None).unwrap();
        }

        let removed = store.invalidate_pattern(&KeyPattern::regex("^blog:").unwrap());

        assert_eq!(removed, 2);
        assert_eq!(store.stats().keys, vec!["case-study:a".to_string()]);
    }

    #[test]
    fn test_store_clear() {
        let mut store = store();
        store.set("a".to_string(), "1".to_string(), None).unwrap();
        store.set("b".to_string(), "2".to_string(), None).unwrap();

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_stats() {
        let mut store = store();

        store.set("b".to_string(), "2".to_string(), None).unwrap();
        store.set("a".to_string(), "1".to_string(), None).unwrap();
        store.get("a"); // hit
        store.get("missing"); // miss

        let stats = store.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_stats_hide_expired() {
        let mut store = store();
        store.set("short".to_string(), "v".to_string(), Some(Duration::from_secs(1))).unwrap();
        store.set("long".to_string(), "v".to_string(), Some(Duration::from_secs(60))).unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        let stats = store.stats();
        assert_eq!(stats.keys, vec!["long".to_string()]);
        // Still physically present until swept
        assert_eq!(store.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let mut store = store();

        store.set("key1".to_string(), "value1".to_string(), Some(Duration::from_secs(1))).unwrap();
        store.set("key2".to_string(), "value2".to_string(), Some(Duration::from_secs(10))).unwrap();

        tokio::time::advance(Duration::from_millis(1100)).await;

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }
}
