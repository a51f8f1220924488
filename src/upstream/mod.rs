//! Upstream search source
//!
//! The refresh routine only needs one thing from the search API: fetch a page
//! by URL and report its items plus the pagination links.

pub mod github;
pub mod links;
pub mod query;

use async_trait::async_trait;
use serde::Deserialize;

use crate::record::RepoRecord;
use crate::Result;

pub use github::GitHubSearch;
pub use links::{parse_link_header, PageLinks};
pub use query::build_search_url;

/// A paginated repository search API
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Fetch one page of results
    async fn fetch_page(&self, url: &str) -> Result<SearchPage>;
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Final URL of the request, after redirects
    pub url: String,
    pub items: Vec<SearchItem>,
    pub links: PageLinks,
}

/// Body of a search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub items: Vec<SearchItem>,
}

/// Repository fields we keep from a search result item
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub created_at: String,
    /// Null for repositories that were never pushed to
    pub pushed_at: Option<String>,
    pub stargazers_count: u32,
}

impl From<SearchItem> for RepoRecord {
    fn from(item: SearchItem) -> Self {
        RepoRecord {
            external_id: item.id,
            name: item.name,
            description: item.description,
            url: item.html_url,
            created_at: item.created_at,
            pushed_at: item.pushed_at.unwrap_or_default(),
            star_count: item.stargazers_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_body() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 1296269,
                    "name": "Hello-World",
                    "full_name": "octocat/Hello-World",
                    "description": null,
                    "html_url": "https://github.com/octocat/Hello-World",
                    "created_at": "2011-01-26T19:01:12Z",
                    "pushed_at": "2011-01-26T19:06:43Z",
                    "stargazers_count": 80,
                    "language": "Python"
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total_count, Some(2));
        assert_eq!(response.items.len(), 1);

        let record: RepoRecord = response.items[0].clone().into();
        assert_eq!(record.external_id, 1296269);
        assert_eq!(record.name, "Hello-World");
        assert_eq!(record.description, None);
        assert_eq!(record.url, "https://github.com/octocat/Hello-World");
        assert_eq!(record.pushed_at, "2011-01-26T19:06:43Z");
        assert_eq!(record.star_count, 80);
    }
}
