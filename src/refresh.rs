//! Full cache rebuild from the paginated search API
//!
//! The refresh wipes the record store, then walks search pages one at a time
//! following the `next` link relation, upserting each item until
//! `max_results` items have been stored or the pages run out.

use crate::config::AppConfig;
use crate::storage::RepoStore;
use crate::ui::RefreshProgress;
use crate::upstream::{build_search_url, SearchSource};
use crate::{Error, Result};

pub const MAX_PER_PAGE: u32 = 100;
pub const MAX_RESULTS: u32 = 1000;

/// Validated page size and result cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshLimits {
    pub per_page: u32,
    pub max_results: u32,
}

impl RefreshLimits {
    /// Out-of-range values are rejected, never clamped.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let per_page = config
            .per_page()
            .ok_or_else(|| Error::InvalidConfig("search_parameters.per_page must be an integer".to_string()))?;
        if !(1..=i64::from(MAX_PER_PAGE)).contains(&per_page) {
            return Err(Error::InvalidConfig(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }

        let max_results = config.max_results;
        if !(1..=MAX_RESULTS).contains(&max_results) {
            return Err(Error::InvalidConfig(format!(
                "max_results must be between 1 and {MAX_RESULTS}, got {max_results}"
            )));
        }

        Ok(Self {
            per_page: per_page as u32,
            max_results,
        })
    }

    /// Pages needed to reach `max_results`, rounded up
    pub fn expected_pages(&self) -> usize {
        self.max_results.div_ceil(self.per_page) as usize
    }
}

/// Outcome of a completed refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Items upserted, duplicates included
    pub records: usize,
    /// Pages fetched
    pub pages: usize,
}

pub fn progress_percent(page: usize, expected_pages: usize) -> u64 {
    if expected_pages == 0 {
        return 100;
    }
    ((page * 100) / expected_pages).min(100) as u64
}

/// Rebuild `store` from `source`.
///
/// On any error the store is left holding whatever was written before the
/// failure.
pub async fn refresh<S>(store: &RepoStore, source: &S, config: &AppConfig) -> Result<RefreshReport>
where
    S: SearchSource + ?Sized,
{
    let limits = RefreshLimits::from_config(config).inspect_err(|e| {
        tracing::error!("Refusing to refresh: {}", e);
    })?;
    let first_url = build_search_url(&config.search_url, &config.search_parameters)
        .inspect_err(|e| tracing::error!("Refusing to refresh: {}", e))?;

    let progress = RefreshProgress::new(limits.expected_pages(), config.show_messages);
    match run(store, source, limits, first_url, &progress).await {
        Ok(report) => {
            progress.finish(report.records);
            tracing::info!(
                "Refresh complete: {} records from {} page(s)",
                report.records,
                report.pages
            );
            Ok(report)
        }
        Err(e) => {
            progress.abandon();
            match &e {
                Error::Storage(_) => tracing::error!("A database error occurred during refresh: {}", e),
                Error::Http(_) | Error::Upstream(_) => {
                    tracing::error!("A search API request failed during refresh: {}", e)
                }
                _ => tracing::error!("Refresh failed: {}", e),
            }
            Err(e)
        }
    }
}

async fn run<S>(
    store: &RepoStore,
    source: &S,
    limits: RefreshLimits,
    first_url: String,
    progress: &RefreshProgress,
) -> Result<RefreshReport>
where
    S: SearchSource + ?Sized,
{
    let expected_pages = limits.expected_pages();
    let max_results = limits.max_results as usize;

    store.replace_all()?;

    let mut url = first_url;
    let mut records = 0usize;
    let mut pages = 0usize;

    loop {
        tracing::debug!("Fetching page {} of at most {}: {}", pages + 1, expected_pages, url);
        let page = source.fetch_page(&url).await?;
        pages += 1;
        tracing::debug!(
            "Received {} items from {} (last page: {})",
            page.items.len(),
            page.url,
            page.links.last.as_deref().unwrap_or("unknown")
        );

        for item in page.items {
            store.upsert(&item.into())?;
            records += 1;
            if records >= max_results {
                break;
            }
        }

        let percent = progress_percent(pages, expected_pages);
        tracing::info!("Refresh progress: {}% ({} records)", percent, records);
        progress.page_done(pages, percent);

        if records >= max_results || pages >= expected_pages {
            break;
        }
        match page.links.next {
            Some(next) => url = next,
            None => break,
        }
    }

    Ok(RefreshReport { records, pages })
}
