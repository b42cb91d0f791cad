//! API Routes
//!
//! Configures the Axum router with all gallery server endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, gallery_handler, health_handler, method_not_allowed_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Compression: gzip when the client accepts it
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
///
/// Other methods on a known path get `405 Method Not Allowed` with an
/// `Allow` header and the usual JSON error body.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gallery", get(gallery_handler))
        .route("/api/cache", delete(clear_cache_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
