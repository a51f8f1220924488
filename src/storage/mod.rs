//! Storage Layer - SQLite-backed persistence
//!
//! A single table caches the latest search results:
//! - repositories(external_id, name, description, url, created, pushed, stars)

pub mod schema;
pub mod sqlite;

pub use sqlite::RepoStore;
