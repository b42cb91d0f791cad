//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::notion::{NotionConfig, DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Notion integration token; empty when not configured
    pub notion_token: String,
    /// Notion API base URL
    pub notion_api_base: String,
    /// `Notion-Version` header value
    pub notion_version: String,
    /// Upstream request timeout in milliseconds
    pub notion_timeout_ms: u64,
    /// Serve canned pages when no token is configured
    pub mock_notion: bool,
    /// Default TTL in milliseconds for cached gallery responses
    pub cache_ttl_ms: u64,
    /// Maximum number of cached gallery responses
    pub cache_max_entries: usize,
    /// Share one upstream fetch between concurrent identical misses
    pub coalesce_fetches: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `NOTION_TOKEN`, then `NOTION_API_KEY` - Integration token (default: empty)
    /// - `NOTION_API_BASE` - API base URL (default: https://api.notion.com/v1)
    /// - `NOTION_VERSION` - API version header (default: 2022-06-28)
    /// - `NOTION_TIMEOUT_MS` - Upstream timeout (default: 10000)
    /// - `MOCK_NOTION` - Use the offline mock without a token (default: false)
    /// - `CACHE_TTL_MS` - Default cache TTL (default: 300000)
    /// - `CACHE_MAX_ENTRIES` - Cache capacity (default: 500)
    /// - `COALESCE_FETCHES` - Coalesce concurrent misses (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let notion_token = env::var("NOTION_TOKEN")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| env::var("NOTION_API_KEY").ok())
            .unwrap_or_default();

        Self {
            server_port: env_or("PORT", defaults.server_port),
            notion_token,
            notion_api_base: env::var("NOTION_API_BASE").unwrap_or(defaults.notion_api_base),
            notion_version: env::var("NOTION_VERSION").unwrap_or(defaults.notion_version),
            notion_timeout_ms: env_or("NOTION_TIMEOUT_MS", defaults.notion_timeout_ms),
            mock_notion: env_or("MOCK_NOTION", defaults.mock_notion),
            cache_ttl_ms: env_or("CACHE_TTL_MS", defaults.cache_ttl_ms),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            coalesce_fetches: env_or("COALESCE_FETCHES", defaults.coalesce_fetches),
        }
    }

    /// Settings for the upstream Notion client.
    pub fn notion_config(&self) -> NotionConfig {
        NotionConfig {
            token: self.notion_token.clone(),
            base_url: self.notion_api_base.clone(),
            version: self.notion_version.clone(),
            timeout: Duration::from_millis(self.notion_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            notion_token: String::new(),
            notion_api_base: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            notion_timeout_ms: 10_000,
            mock_notion: false,
            cache_ttl_ms: 300_000,
            cache_max_entries: 500,
            coalesce_fetches: true,
        }
    }
}

/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
