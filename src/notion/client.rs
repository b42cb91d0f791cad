//! HTTP client for the Notion database-query endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{ApiErrorBody, DatabaseQuery, NotionApi, NotionError, Page, QueryBody, QueryResponse};

/// Default base URL for the Notion API.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest page size Notion accepts for one query.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Notion client configuration.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// `Notion-Version` header value.
    pub version: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Notion API client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    config: NotionConfig,
}

impl NotionClient {
    /// Create a client. Fails when no token is configured.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        if config.token.is_empty() {
            return Err(NotionError::MissingToken);
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    fn query_url(&self, database_id: &str) -> String {
        format!(
            "{}/databases/{}/query",
            self.config.base_url.trim_end_matches('/'),
            database_id
        )
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn query_database(&self, query: &DatabaseQuery) -> Result<Vec<Page>, NotionError> {
        let start = Instant::now();
        let body = QueryBody {
            page_size: query.page_size.clamp(1, MAX_PAGE_SIZE),
            filter: query.filter.as_ref(),
            sorts: query.sorts.as_ref(),
        };

        tracing::debug!(
            database_id = %query.database_id,
            page_size = body.page_size,
            "querying Notion database"
        );

        let response = self
            .http
            .post(self.query_url(&query.database_id))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Notion API response status: {}", status);

        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.ok();
            let code = body.as_ref().and_then(|b| b.code.as_deref()).unwrap_or("unknown");
            tracing::warn!(
                %status,
                code,
                database_id = %query.database_id,
                "Notion query rejected"
            );

            let message = body.and_then(|b| b.message).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(error_for_status(status, message));
        }

        let bytes = response.bytes().await?;
        let parsed: QueryResponse =
            serde_json::from_slice(&bytes).map_err(|e| NotionError::Parse(e.to_string()))?;

        tracing::debug!(
            "query completed in {:?}, {} pages (has_more={}, next_cursor={:?})",
            start.elapsed(),
            parsed.results.len(),
            parsed.has_more,
            parsed.next_cursor
        );

        Ok(parsed.results)
    }
}

fn error_for_status(status: StatusCode, message: String) -> NotionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NotionError::Auth {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => NotionError::NotFound { message },
        StatusCode::TOO_MANY_REQUESTS => NotionError::RateLimited,
        _ => NotionError::Http {
            status: status.as_u16(),
            message,
        },
    }
}
