//! Cache Statistics Module
//!
//! Counters the store keeps about its own lookups and evictions.

use serde::Serialize;

/// Outcome of one `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
    /// Entry was present but past its deadline; removed and counted as a miss.
    Expired,
}

// == Cache Stats ==
/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that found nothing live, expired entries included
    pub misses: u64,
    /// Entries dropped to get back under capacity
    pub evictions: u64,
    /// Expired entries reaped on lookup
    pub expirations: u64,
    /// Stored entries at snapshot time, expired-but-unread ones included
    pub total_entries: usize,
}

impl CacheStats {
    pub fn record(&mut self, lookup: Lookup) {
        match lookup {
            Lookup::Hit => self.hits += 1,
            Lookup::Miss => self.misses += 1,
            Lookup::Expired => {
                self.expirations += 1;
                self.misses += 1;
            }
        }
    }

    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    /// Copy of the counters with the entry count filled in.
    pub fn snapshot(&self, total_entries: usize) -> Self {
        Self {
            total_entries,
            ..self.clone()
        }
    }

    /// Number of `get` calls observed.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// hits / lookups, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
