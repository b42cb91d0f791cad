//! Request DTOs for the gallery API
//!
//! Defines the query string accepted by `GET /api/gallery` and the validated
//! request it parses into.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cache::derive_cache_key;
use crate::error::{GalleryError, Result};
use crate::models::normalize_database_id;
use crate::notion::{DatabaseQuery, ItemOptions, MAX_PAGE_SIZE};

/// Page size used when `limit` is absent or unparseable.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest TTL override a caller may request (24 hours).
pub const MAX_TTL_MS: u64 = 86_400_000;

/// Raw query string of `GET /api/gallery`.
///
/// Every field is taken as text so that a malformed number or JSON value
/// degrades to its default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryQuery {
    pub database_id: Option<String>,
    pub limit: Option<String>,
    pub subtitle_prop: Option<String>,
    pub url_prop: Option<String>,
    pub cover_prop: Option<String>,
    pub filter: Option<String>,
    pub sorts: Option<String>,
    pub ttl_ms: Option<String>,
}

/// A validated gallery request.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryRequest {
    /// Normalized dashed UUID of the database
    pub database_id: String,
    /// Parameters that shape the upstream query and the cache key
    pub params: QueryParams,
    /// Caller-supplied TTL override, already clamped
    pub ttl_ms: Option<u64>,
}

/// Everything besides the database id that changes what a query returns.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub limit: u32,
    pub subtitle_prop: Option<String>,
    pub url_prop: Option<String>,
    pub cover_prop: Option<String>,
    pub filter: Option<Value>,
    pub sorts: Option<Value>,
}

impl GalleryQuery {
    /// Validates the query string.
    ///
    /// Only a missing or unrecognizable `databaseId` is an error; every other
    /// field falls back to its default when it cannot be parsed.
    pub fn parse(&self) -> Result<GalleryRequest> {
        let database_id = self
            .database_id
            .as_deref()
            .and_then(normalize_database_id)
            .ok_or_else(|| {
                GalleryError::InvalidRequest(
                    "Missing required query parameter: databaseId".to_string(),
                )
            })?;

        let params = QueryParams {
            limit: parse_limit(self.limit.as_deref()),
            subtitle_prop: non_empty(&self.subtitle_prop),
            url_prop: non_empty(&self.url_prop),
            cover_prop: non_empty(&self.cover_prop),
            filter: parse_json(self.filter.as_deref()),
            sorts: parse_json(self.sorts.as_deref()),
        };

        Ok(GalleryRequest {
            database_id,
            params,
            ttl_ms: parse_ttl(self.ttl_ms.as_deref()),
        })
    }
}

impl QueryParams {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            subtitle_prop: None,
            url_prop: None,
            cover_prop: None,
            filter: None,
            sorts: None,
        }
    }

    /// JSON object of the parameters, absent fields omitted.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("limit".to_string(), Value::from(self.limit));

        let optional = [
            ("subtitleProp", self.subtitle_prop.clone().map(Value::String)),
            ("urlProp", self.url_prop.clone().map(Value::String)),
            ("coverProp", self.cover_prop.clone().map(Value::String)),
            ("filter", self.filter.clone()),
            ("sorts", self.sorts.clone()),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                map.insert(name.to_string(), value);
            }
        }

        Value::Object(map)
    }

    /// Cache key for this query against `database_id`.
    pub fn cache_key(&self, database_id: &str) -> String {
        derive_cache_key(database_id, &self.to_value())
    }

    pub fn database_query(&self, database_id: &str) -> DatabaseQuery {
        DatabaseQuery {
            database_id: database_id.to_string(),
            filter: self.filter.clone(),
            sorts: self.sorts.clone(),
            page_size: self.limit,
        }
    }

    pub fn item_options(&self) -> ItemOptions {
        ItemOptions {
            subtitle_prop: self.subtitle_prop.clone(),
            url_prop: self.url_prop.clone(),
            cover_prop: self.cover_prop.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn parse_limit(raw: Option<&str>) -> u32 {
    parse_number(raw)
        .map(|n| n.clamp(1.0, f64::from(MAX_PAGE_SIZE)) as u32)
        .unwrap_or(DEFAULT_LIMIT)
}

fn parse_ttl(raw: Option<&str>) -> Option<u64> {
    parse_number(raw).map(|n| n.clamp(0.0, MAX_TTL_MS as f64) as u64)
}

/// Parses a JSON parameter; malformed text and `null` count as absent.
fn parse_json(raw: Option<&str>) -> Option<Value> {
    raw.filter(|v| !v.is_empty())
        .and_then(|v| serde_json::from_str::<Value>(v).ok())
        .filter(|v| !v.is_null())
}
