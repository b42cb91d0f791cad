//! API Handlers
//!
//! HTTP request handlers for each gallery server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStore, InFlight};
use crate::config::Config;
use crate::error::{GalleryError, Result};
use crate::models::{
    ClearResponse, ErrorResponse, GalleryPayload, GalleryQuery, GalleryRequest, HealthResponse,
    StatsResponse,
};
use crate::notion::{transform_pages, MockNotionClient, NotionApi, NotionClient};

/// Cache of transformed gallery responses, keyed by derived query key.
pub type GalleryCache = CacheStore<Arc<GalleryPayload>>;

/// Application state shared across all handlers.
///
/// Built once at startup; every field is a shared handle, so cloning the
/// state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Response cache
    pub cache: Arc<RwLock<GalleryCache>>,
    /// Upstream client, absent when no token or mock is configured
    pub notion: Option<Arc<dyn NotionApi>>,
    /// Pending fetches by cache key, absent when coalescing is disabled
    pub inflight: Option<Arc<InFlight<Arc<GalleryPayload>>>>,
}

impl AppState {
    /// Creates a new AppState with fetch coalescing enabled.
    pub fn new(cache: GalleryCache, notion: Option<Arc<dyn NotionApi>>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            notion,
            inflight: Some(Arc::new(InFlight::new())),
        }
    }

    /// Lets every miss run its own upstream fetch.
    pub fn without_coalescing(mut self) -> Self {
        self.inflight = None;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses the real client when a token is set, the mock when `MOCK_NOTION`
    /// is enabled, and otherwise starts without an upstream; gallery requests
    /// then fail with a configuration error.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.cache_max_entries, config.cache_ttl_ms);

        let mut notion: Option<Arc<dyn NotionApi>> = None;
        if !config.notion_token.is_empty() {
            match NotionClient::new(config.notion_config()) {
                Ok(client) => notion = Some(Arc::new(client)),
                Err(err) => error!("Notion client init failed: {}", err),
            }
        }
        if notion.is_none() && config.mock_notion {
            match MockNotionClient::new() {
                Ok(client) => {
                    info!("Using mock Notion client");
                    notion = Some(Arc::new(client));
                }
                Err(err) => error!("Mock Notion client init failed: {}", err),
            }
        }
        if notion.is_none() {
            warn!("No Notion client configured; gallery requests will fail");
        }

        let state = Self::new(cache, notion);
        if config.coalesce_fetches {
            state
        } else {
            state.without_coalescing()
        }
    }
}

/// Handler for GET /api/gallery
///
/// Serves the cached payload for the query when one is live; otherwise
/// queries Notion, transforms the pages, caches the result, and returns it.
/// Upstream failures are returned to the caller and never cached.
pub async fn gallery_handler(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Arc<GalleryPayload>>> {
    let request = query.parse()?;

    let notion = state.notion.clone().ok_or_else(|| {
        GalleryError::NotConfigured("Server is not configured with NOTION_TOKEN".to_string())
    })?;

    let key = request.params.cache_key(&request.database_id);

    let cached = state.cache.write().await.get(&key);
    if let Some(payload) = cached {
        debug!(%key, "cache hit");
        return Ok(Json(payload));
    }
    debug!(%key, "cache miss");

    let fetch = || fetch_and_store(&state, notion.as_ref(), &request, &key);
    let result = match &state.inflight {
        Some(inflight) => inflight.run(&key, fetch).await,
        None => fetch().await,
    };

    match result {
        Ok(payload) => Ok(Json(payload)),
        Err(err) => {
            error!(database_id = %request.database_id, "gallery fetch failed: {}", err);
            Err(err)
        }
    }
}

/// Queries upstream, transforms, and stores the payload under `key`.
async fn fetch_and_store(
    state: &AppState,
    notion: &dyn NotionApi,
    request: &GalleryRequest,
    key: &str,
) -> Result<Arc<GalleryPayload>> {
    let query = request.params.database_query(&request.database_id);
    let pages = notion.query_database(&query).await?;

    let items = transform_pages(&pages, &request.params.item_options());
    let payload = Arc::new(GalleryPayload::new(items));

    state
        .cache
        .write()
        .await
        .set(key, payload.clone(), request.ttl_ms);
    debug!(%key, count = payload.count, ttl_ms = ?request.ttl_ms, "cached gallery payload");

    Ok(payload)
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, max_entries) = {
        let cache = state.cache.read().await;
        (cache.stats(), cache.max_entries())
    };
    let in_flight = state.inflight.as_ref().map_or(0, |inflight| inflight.len());

    Json(StatsResponse::new(&stats, max_entries, in_flight))
}

/// Handler for DELETE /api/cache
///
/// Drops every cached response.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.cache.write().await.clear();
    info!("Cache cleared: {} entries removed", cleared);

    Json(ClearResponse::new(cleared))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Answers a known path called with the wrong method. The router adds `Allow`.
pub async fn method_not_allowed_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method Not Allowed")),
    )
}
