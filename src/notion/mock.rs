//! Offline stand-in for the Notion API.
//!
//! Serves a fixed set of sample pages so the gallery can be exercised without
//! an integration token (`MOCK_NOTION=true`).

use async_trait::async_trait;
use serde_json::json;

use super::{DatabaseQuery, NotionApi, NotionError, Page, MAX_PAGE_SIZE};

/// Notion client returning canned pages for any database.
#[derive(Debug, Clone)]
pub struct MockNotionClient {
    pages: Vec<Page>,
}

impl MockNotionClient {
    pub fn new() -> Result<Self, NotionError> {
        let pages = serde_json::from_value(sample_pages())
            .map_err(|e| NotionError::Parse(e.to_string()))?;
        Ok(Self { pages })
    }
}

#[async_trait]
impl NotionApi for MockNotionClient {
    async fn query_database(&self, query: &DatabaseQuery) -> Result<Vec<Page>, NotionError> {
        let take = query.page_size.clamp(1, MAX_PAGE_SIZE) as usize;
        tracing::debug!(database_id = %query.database_id, "serving mock Notion pages");
        Ok(self.pages.iter().take(take).cloned().collect())
    }
}

fn sample_pages() -> serde_json::Value {
    json!([
        {
            "id": "mock-page-1",
            "url": "https://www.notion.so/mock-page-1",
            "cover": { "type": "external", "external": { "url": "https://picsum.photos/seed/gallery1/640/360" } },
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "Mountain Retreat" }] },
                "Category": { "type": "select", "select": { "name": "Travel" } },
                "Link": { "type": "url", "url": "https://example.com/mountain" }
            }
        },
        {
            "id": "mock-page-2",
            "url": "https://www.notion.so/mock-page-2",
            "cover": null,
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "City Lights" }] },
                "Category": { "type": "select", "select": { "name": "Photography" } },
                "Images": {
                    "type": "files",
                    "files": [{ "name": "city.jpg", "type": "external", "external": { "url": "https://picsum.photos/seed/gallery2/640/360.jpg" } }]
                }
            }
        },
        {
            "id": "mock-page-3",
            "url": "https://www.notion.so/mock-page-3",
            "cover": null,
            "properties": {
                "Name": { "type": "title", "title": [] },
                "Category": { "type": "multi_select", "multi_select": [{ "name": "Draft" }, { "name": "Ideas" }] }
            }
        }
    ])
}
