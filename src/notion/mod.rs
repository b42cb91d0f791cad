//! Notion Module
//!
//! Upstream collaborator for the gallery: the database-query client, an
//! offline mock, and the page to gallery item transform.

mod client;
mod error;
mod mock;
mod transform;
mod types;

use async_trait::async_trait;

pub use client::{
    NotionClient, NotionConfig, DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION, MAX_PAGE_SIZE,
};
pub use error::NotionError;
pub use mock::MockNotionClient;
pub use transform::{plain_text, transform_pages, ItemOptions, UNTITLED};
pub use types::{
    ApiErrorBody, DatabaseQuery, FileObject, FileUrl, Page, PropertyValue, QueryBody, QueryResponse,
    RichText,
};

/// Source of database pages.
///
/// Implemented by the HTTP client and the mock; handlers only see this trait.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Runs one query and returns the matching pages, first page of results only.
    async fn query_database(&self, query: &DatabaseQuery) -> Result<Vec<Page>, NotionError>;
}
