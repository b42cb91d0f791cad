//! Notion Gallery - A caching gallery proxy for Notion databases
//!
//! Serves database rows as gallery cards, keeping transformed responses in a
//! bounded cache with TTL expiration and LRU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod notion;

pub use api::AppState;
pub use config::Config;
