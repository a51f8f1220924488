//! # Repocache - Repository Search Cache
//!
//! Pulls repository metadata from a paginated search API into a local
//! SQLite table and re-serves it over HTTP.
//!
//! Repocache provides:
//! - Typed TOML configuration
//! - SQLite-backed record store with upsert and full-table replace
//! - Paginated refresh driven by `Link` header relations
//! - An axum query service (`GET /`, `GET /repos`)

pub mod config;
pub mod record;
pub mod storage;
pub mod upstream;
pub mod refresh;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use config::AppConfig;
pub use record::RepoRecord;
pub use storage::RepoStore;
pub use refresh::{refresh, RefreshReport};
pub use upstream::{GitHubSearch, SearchSource};

/// Result type alias for Repocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Repocache operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown configuration key: {0}")]
    UnknownConfigKey(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
