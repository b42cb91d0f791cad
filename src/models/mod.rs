//! Request and Response models for the gallery API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod database_id;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use database_id::normalize_database_id;
pub use requests::{GalleryQuery, GalleryRequest, QueryParams, DEFAULT_LIMIT, MAX_TTL_MS};
pub use responses::{
    ClearResponse, ErrorResponse, GalleryItem, GalleryPayload, HealthResponse, StatsResponse,
};
