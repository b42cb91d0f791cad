//! Recency Tracking
//!
//! Orders cache keys by last access so the store knows what to evict first.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Least-recently-used ordering over cache keys.
///
/// Every touch stamps the key with a strictly increasing tick. The lowest
/// tick is the least recently used key, the highest the most recently used.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Keys ordered by last access tick
    order: BTreeMap<u64, String>,
    /// Current tick for each tracked key
    ticks: HashMap<String, u64>,
    /// Next tick to hand out
    next_tick: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An already tracked key loses its previous position.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        match self.ticks.get_mut(key) {
            Some(old) => {
                self.order.remove(old);
                *old = tick;
            }
            None => {
                self.ticks.insert(key.to_string(), tick);
            }
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Pops the least recently used key, if any.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.ticks.clear();
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(keys: &[&str]) -> LruTracker {
        let mut lru = LruTracker::new();
        for key in keys {
            lru.touch(key);
        }
        lru
    }

    /// Evicts everything, returning keys from least to most recently used.
    fn drain(mut lru: LruTracker) -> Vec<String> {
        std::iter::from_fn(|| lru.evict_oldest()).collect()
    }

    #[test]
    fn test_empty_tracker() {
        let mut lru = LruTracker::default();
        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_insertion_order_is_recency_order() {
        let lru = tracker(&["gallery:a", "gallery:b", "gallery:c"]);
        assert_eq!(lru.len(), 3);
        assert_eq!(drain(lru), vec!["gallery:a", "gallery:b", "gallery:c"]);
    }

    #[test]
    fn test_touch_moves_key_to_back() {
        let mut lru = tracker(&["gallery:a", "gallery:b", "gallery:c"]);
        lru.touch("gallery:a");

        assert_eq!(lru.len(), 3);
        assert_eq!(drain(lru), vec!["gallery:b", "gallery:c", "gallery:a"]);
    }

    #[test]
    fn test_repeated_touch_tracks_once() {
        let mut lru = tracker(&["gallery:x", "gallery:x", "gallery:x"]);
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("gallery:x"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_evict_follows_latest_touches() {
        let mut lru = tracker(&["a", "b", "c"]);
        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(drain(lru), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_remove_ignores_unknown_keys() {
        let mut lru = tracker(&["a", "b", "c"]);
        lru.remove("b");
        lru.remove("missing");

        assert_eq!(lru.len(), 2);
        assert_eq!(drain(lru), vec!["a", "c"]);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut lru = tracker(&["a", "b"]);
        lru.clear();
        assert!(lru.is_empty());

        lru.touch("c");
        assert_eq!(drain(lru), vec!["c"]);
    }
}
