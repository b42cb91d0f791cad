//! Error types for the gallery server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::notion::NotionError;

// == Gallery Error Enum ==
/// Unified error type for the gallery server.
///
/// The cache itself never fails; these all come from request validation,
/// configuration, or the upstream fetch on a miss.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// No upstream client available
    #[error("{0}")]
    NotConfigured(String),

    /// Upstream query failed
    #[error("Failed to fetch Notion data: {0}")]
    Upstream(#[from] NotionError),
}

impl GalleryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GalleryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GalleryError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GalleryError::Upstream(err) => err
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gallery server.
pub type Result<T> = std::result::Result<T, GalleryError>;
