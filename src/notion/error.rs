//! Notion client error types.

use std::sync::Arc;

/// Errors from the Notion database-query API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotionError {
    /// No integration token configured.
    #[error("missing Notion token: NOTION_TOKEN not set")]
    MissingToken,

    /// Token rejected or lacking access (401/403).
    #[error("authentication failed: {message}")]
    Auth { status: u16, message: String },

    /// Database does not exist or is not shared with the integration.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Rate limited by Notion.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Any other non-success HTTP response.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl NotionError {
    /// HTTP status reported by Notion, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::Auth { status, .. } => Some(*status),
            NotionError::NotFound { .. } => Some(404),
            NotionError::RateLimited => Some(429),
            NotionError::Http { status, .. } => Some(*status),
            NotionError::MissingToken
            | NotionError::Timeout
            | NotionError::Network(_)
            | NotionError::Parse(_) => None,
        }
    }
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotionError::Timeout
        } else {
            NotionError::Network(Arc::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotionError::MissingToken;
        assert!(err.to_string().contains("NOTION_TOKEN"));

        let err = NotionError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 502: bad gateway");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            NotionError::Auth {
                status: 403,
                message: "restricted".to_string()
            }
            .status(),
            Some(403)
        );
        assert_eq!(
            NotionError::NotFound {
                message: "gone".to_string()
            }
            .status(),
            Some(404)
        );
        assert_eq!(NotionError::RateLimited.status(), Some(429));
        assert_eq!(NotionError::Timeout.status(), None);
        assert_eq!(NotionError::Parse("eof".to_string()).status(), None);
    }
}
