//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;

use crate::cache::{
    CacheEntry, CacheStats, Clock, Lookup, LruTracker, SystemClock, DEFAULT_MAX_ENTRIES,
    DEFAULT_TTL_MS,
};

// == Cache Store ==
/// Bounded cache with per-entry TTL and LRU eviction.
///
/// Expired entries are reaped lazily when looked up; there is no sweep. Until
/// then they still count against `max_entries` and are the first to go under
/// capacity pressure if nobody touches them.
#[derive(Debug)]
pub struct CacheStore<V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed after a `set`
    max_entries: usize,
    /// TTL in milliseconds for entries stored without an override
    default_ttl_ms: u64,
    /// Time source for stamping and checking expirations
    clock: C,
}

impl<V: Clone> CacheStore<V, SystemClock> {
    // == Constructor ==
    /// Creates a new CacheStore on the wall clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `default_ttl_ms` - TTL in milliseconds for entries without an override
    pub fn new(max_entries: usize, default_ttl_ms: u64) -> Self {
        Self::with_clock(max_entries, default_ttl_ms, SystemClock)
    }
}

impl<V: Clone> Default for CacheStore<V, SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS)
    }
}

impl<V: Clone, C: Clock> CacheStore<V, C> {
    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(max_entries: usize, default_ttl_ms: u64, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::default(),
            max_entries,
            default_ttl_ms,
            clock,
        }
    }

    // == Get ==
    /// Retrieves a live value by key and marks it most recently used.
    ///
    /// An entry found expired is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record(Lookup::Miss);
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record(Lookup::Expired);
            return None;
        }

        self.lru.touch(key);
        self.stats.record(Lookup::Hit);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key.
    ///
    /// The entry expires `ttl_ms` after now, or after the default TTL when no
    /// override is given. A TTL of zero stores an entry that is already
    /// expired. Once inserted, least recently used entries are evicted until
    /// the store is back within `max_entries`.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let key = key.into();
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, now, ttl_ms.unwrap_or(self.default_ttl_ms));

        self.lru.touch(&key);
        self.entries.insert(key, entry);

        let mut evicted = 0;
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        self.stats.record_evictions(evicted);
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        removed
    }

    /// Changes the capacity bound. Takes effect at the next `set`.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Length ==
    /// Returns the number of stored entries, expired-but-unread ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether an entry occupies a slot for `key`, live or not.
    ///
    /// Does not touch recency or reap expired entries.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn store_with_clock(
        max_entries: usize,
        default_ttl_ms: u64,
    ) -> (CacheStore<String, ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = CacheStore::with_clock(max_entries, default_ttl_ms, clock.clone());
        (store, clock)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, 300_000);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
        assert_eq!(store.default_ttl_ms(), 300_000);
    }

    #[test]
    fn test_store_default_configuration() {
        let store: CacheStore<String> = CacheStore::default();
        assert_eq!(store.max_entries(), 200);
        assert_eq!(store.default_ttl_ms(), 300_000);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100, 300_000);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), None);
        store.set("key1", "value2".to_string(), None);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), Some(10));
        assert_eq!(store.get("key1"), Some("value1".to_string()));

        clock.advance(11);

        assert_eq!(store.get("key1"), None);
        assert!(store.is_empty(), "Expired entry should be reaped on lookup");
    }

    #[test]
    fn test_store_expires_exactly_at_deadline() {
        let (mut store, clock) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), Some(10));
        clock.advance(10);

        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_default_ttl_applies() {
        let (mut store, clock) = store_with_clock(100, 50);

        store.set("key1", "value1".to_string(), None);

        clock.advance(49);
        assert!(store.get("key1").is_some());

        clock.advance(1);
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_zero_ttl_is_immediately_expired() {
        let (mut store, _) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), Some(0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_replacement_resets_expiry() {
        let (mut store, clock) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), Some(1_000));
        store.set("key1", "value2".to_string(), Some(5));

        clock.advance(5);

        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_replacement_can_extend_expiry() {
        let (mut store, clock) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), Some(5));
        store.set("key1", "value2".to_string(), Some(1_000));

        clock.advance(5);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with_clock(3, 300_000);

        store.set("key1", "value1".to_string(), None);
        store.set("key2", "value2".to_string(), None);
        store.set("key3", "value3".to_string(), None);
        store.set("key4", "value4".to_string(), None);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(3, 300_000);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.set("c", "3".to_string(), None);

        store.get("a");
        store.set("d", "4".to_string(), None);

        assert!(!store.contains_key("b"), "b was least recently used");
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.get("c"), Some("3".to_string()));
        assert_eq!(store.get("d"), Some("4".to_string()));
    }

    #[test]
    fn test_store_replacing_key_moves_it_to_most_recent() {
        let (mut store, _) = store_with_clock(3, 300_000);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.set("c", "3".to_string(), None);

        store.set("a", "1b".to_string(), None);
        store.set("d", "4".to_string(), None);

        assert!(store.contains_key("a"));
        assert!(!store.contains_key("b"));
    }

    #[test]
    fn test_store_expired_entries_hold_capacity_until_evicted() {
        let (mut store, clock) = store_with_clock(2, 300_000);

        store.set("short", "1".to_string(), Some(1));
        store.set("long", "2".to_string(), None);
        clock.advance(10);

        assert_eq!(store.len(), 2);

        store.set("new", "3".to_string(), None);

        assert!(!store.contains_key("short"));
        assert!(store.contains_key("long"));
        assert!(store.contains_key("new"));
    }

    #[test]
    fn test_store_lowered_capacity_evicts_several_on_next_set() {
        let (mut store, _) = store_with_clock(5, 300_000);

        for key in ["a", "b", "c", "d", "e"] {
            store.set(key, key.to_string(), None);
        }

        store.set_max_entries(2);
        assert_eq!(store.len(), 5, "Lowering capacity alone does not evict");

        store.set("f", "f".to_string(), None);

        assert_eq!(store.len(), 2);
        assert!(store.contains_key("e"));
        assert!(store.contains_key("f"));
        assert_eq!(store.stats().evictions, 4);
    }

    #[test]
    fn test_store_zero_capacity_keeps_nothing() {
        let (mut store, _) = store_with_clock(0, 300_000);

        store.set("a", "1".to_string(), None);

        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock(100, 300_000);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);

        assert_eq!(store.clear(), 2);
        assert_eq!(store.len(), 0);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), None);
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn test_store_usable_after_clear() {
        let (mut store, _) = store_with_clock(2, 300_000);

        store.set("a", "1".to_string(), None);
        store.clear();
        store.set("b", "2".to_string(), None);
        store.set("c", "3".to_string(), None);
        store.set("d", "4".to_string(), None);

        assert_eq!(store.len(), 2);
        assert!(!store.contains_key("b"));
    }

    #[test]
    fn test_store_stats() {
        let (mut store, clock) = store_with_clock(100, 300_000);

        store.set("key1", "value1".to_string(), None);
        store.set("key2", "value2".to_string(), Some(1));
        store.get("key1");
        store.get("nonexistent");
        clock.advance(5);
        store.get("key2");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
