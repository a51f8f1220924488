use async_trait::async_trait;
use reqwest::header::{ACCEPT, LINK};
use std::time::Duration;

use super::{parse_link_header, PageLinks, SearchPage, SearchResponse, SearchSource};
use crate::{Error, Result};

/// GitHub repository search over REST
#[derive(Clone)]
pub struct GitHubSearch {
    client: reqwest::Client,
}

fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(concat!("repocache/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
}

impl GitHubSearch {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = client_builder(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchSource for GitHubSearch {
    async fn fetch_page(&self, url: &str) -> Result<SearchPage> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("GET {} -> {} in {}ms", url, status, start.elapsed().as_millis());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(Error::Upstream(format!("{url} returned {status}: {snippet}")));
        }

        let final_url = response.url().to_string();
        let links = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_else(PageLinks::default);

        let body: SearchResponse = response.json().await?;
        if let Some(total) = body.total_count {
            tracing::debug!("Search reports {} total results", total);
        }

        Ok(SearchPage {
            url: final_url,
            items: body.items,
            links,
        })
    }
}
