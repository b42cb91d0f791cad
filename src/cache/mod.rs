//! Cache Module
//!
//! In-memory response caching with TTL expiration and LRU eviction, plus the
//! key derivation and fetch coalescing that sit in front of it.

mod clock;
mod entry;
mod inflight;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use inflight::InFlight;
pub use key::{derive_cache_key, KEY_PREFIX};
pub use lru::LruTracker;
pub use stats::{CacheStats, Lookup};
pub use store::CacheStore;

// == Public Constants ==
/// Default TTL in milliseconds (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 300_000;

/// Default maximum number of entries
pub const DEFAULT_MAX_ENTRIES: usize = 200;
