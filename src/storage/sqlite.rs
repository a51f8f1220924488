//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::record::RepoRecord;
use super::schema;

const SELECT_COLUMNS: &str =
    "SELECT external_id, name, description, url, created, pushed, stars FROM repositories";

/// SQLite-backed cache of repository records
pub struct RepoStore {
    conn: Connection,
}

impl RepoStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Drop every record by recreating the table. Safe on an empty store.
    pub fn replace_all(&self) -> Result<()> {
        self.conn.execute(schema::DROP_REPOSITORIES_TABLE, [])?;
        self.initialize_schema()?;
        tracing::debug!("Recreated repositories table");
        Ok(())
    }

    /// Insert a record, or overwrite every field of the existing row with the same id.
    ///
    /// Each call commits on its own.
    pub fn upsert(&self, record: &RepoRecord) -> Result<()> {
        if self.exists(record.external_id)? {
            tracing::info!("Repository with id {} already exists, updating", record.external_id);
            self.conn.execute(
                r#"
                UPDATE repositories
                SET name = ?2, description = ?3, url = ?4, created = ?5, pushed = ?6, stars = ?7
                WHERE external_id = ?1
                "#,
                params![
                    record.external_id,
                    record.name,
                    record.description,
                    record.url,
                    record.created_at,
                    record.pushed_at,
                    record.star_count,
                ],
            )?;
        } else {
            tracing::debug!("Inserting repo {} ({})", record.name, record.external_id);
            self.conn.execute(
                r#"
                INSERT INTO repositories (external_id, name, description, url, created, pushed, stars)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.external_id,
                    record.name,
                    record.description,
                    record.url,
                    record.created_at,
                    record.pushed_at,
                    record.star_count,
                ],
            )?;
        }
        Ok(())
    }

    fn exists(&self, external_id: i64) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM repositories WHERE external_id = ?1",
                [external_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Get a record by its upstream id
    pub fn get(&self, external_id: i64) -> Result<Option<RepoRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE external_id = ?1"),
                [external_id],
                Self::row_to_record,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All records, most stars first. Order among equal star counts is unspecified.
    pub fn list_by_popularity(&self) -> Result<Vec<RepoRecord>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY stars DESC"))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM repositories", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn.execute(sql, [])?;
        Ok(())
    }

    /// Helper to convert a row to a RepoRecord
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<RepoRecord> {
        Ok(RepoRecord {
            external_id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            url: row.get(3)?,
            created_at: row.get(4)?,
            pushed_at: row.get(5)?,
            star_count: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: i64, stars: u32) -> RepoRecord {
        RepoRecord::new(id, format!("repo-{id}"), format!("https://github.com/o/repo-{id}"), stars)
            .with_dates("2020-01-01T00:00:00Z", "2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_upsert_insert_and_get() {
        let store = RepoStore::open_in_memory().unwrap();

        let record = sample_record(7, 120).with_description("a repo");
        store.upsert(&record).unwrap();

        let retrieved = store.get(7).unwrap().unwrap();
        assert_eq!(retrieved, record);
        assert!(store.get(8).unwrap().is_none());
    }

    #[test]
    fn test_upsert_overwrites_existing() {
        let store = RepoStore::open_in_memory().unwrap();

        store.upsert(&sample_record(1, 10).with_description("old")).unwrap();
        let updated = RepoRecord::new(1, "renamed", "https://github.com/o/renamed", 99)
            .with_dates("2021-01-01T00:00:00Z", "2025-01-01T00:00:00Z");
        store.upsert(&updated).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let retrieved = store.get(1).unwrap().unwrap();
        assert_eq!(retrieved, updated);
        assert_eq!(retrieved.description, None);
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let store = RepoStore::open_in_memory().unwrap();
        store.replace_all().unwrap();
        store.replace_all().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        store.upsert(&sample_record(1, 1)).unwrap();
        store.upsert(&sample_record(2, 2)).unwrap();
        store.replace_all().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list_by_popularity().unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_by_stars_desc() {
        let store = RepoStore::open_in_memory().unwrap();
        for (id, stars) in [(1, 30), (2, 500), (3, 30), (4, 0), (5, 1200)] {
            store.upsert(&sample_record(id, stars)).unwrap();
        }

        let listed = store.list_by_popularity().unwrap();
        assert_eq!(listed.len(), 5);
        assert!(listed.windows(2).all(|w| w[0].star_count >= w[1].star_count));
        assert_eq!(listed[0].external_id, 5);
        assert_eq!(listed[4].external_id, 4);
    }

    #[test]
    fn test_writes_persist_without_explicit_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.db");

        {
            let store = RepoStore::open(&path).unwrap();
            store.upsert(&sample_record(11, 5)).unwrap();
            store.upsert(&sample_record(12, 6)).unwrap();
        }

        let reopened = RepoStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
        assert_eq!(reopened.get(12).unwrap().unwrap().star_count, 6);
    }
}
