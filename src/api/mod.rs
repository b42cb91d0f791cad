//! API Module
//!
//! HTTP handlers and routing for the gallery server.
//!
//! # Endpoints
//! - `GET /api/gallery` - Cached gallery view of a Notion database
//! - `GET /api/cache/stats` - Cache statistics
//! - `DELETE /api/cache` - Drop every cached response
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
