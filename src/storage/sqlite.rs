//! SQLite document store
//!
//! Persists documents in a single `documents` table with metadata stored as
//! JSON. Text search is a substring match over title and content; this
//! backend reports no relevance score.

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{DocumentRecord, SearchHit, StoreStats};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "url, title, content, metadata, site, stored_at";

/// SQLite-backed document store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            url TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            metadata TEXT NOT NULL,
            site TEXT NOT NULL,
            stored_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_site ON documents(site);
        ",
    )?;
    Ok(())
}

fn row_to_record(row: &Row<'_>) -> StorageResult<DocumentRecord> {
    let metadata_json: String = row.get(3)?;
    let stored_at_str: String = row.get(5)?;

    let metadata = serde_json::from_str(&metadata_json)?;
    let stored_at = DateTime::parse_from_rfc3339(&stored_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Database(format!("bad stored_at timestamp: {}", e)))?;

    Ok(DocumentRecord {
        url: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        metadata,
        site: row.get(4)?,
        stored_at,
    })
}

impl DocumentStore for SqliteStore {
    fn add_documents(&mut self, records: &[DocumentRecord]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO documents (url, title, content, metadata, site, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                let metadata_json = serde_json::to_string(&record.metadata)?;
                stmt.execute(params![
                    record.url,
                    record.title,
                    record.content,
                    metadata_json,
                    record.site,
                    record.stored_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!("Stored {} documents", records.len());
        Ok(())
    }

    fn search(
        &self,
        query: &str,
        limit: usize,
        site: Option<&str>,
    ) -> StorageResult<Vec<SearchHit>> {
        let pattern = format!("%{}%", query);
        let sql_base = format!(
            "SELECT {} FROM documents WHERE (content LIKE ?1 OR title LIKE ?1)",
            SELECT_COLUMNS
        );

        let mut records = Vec::new();
        match site {
            Some(site) => {
                let sql = format!("{} AND site = ?2 ORDER BY url LIMIT ?3", sql_base);
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query(params![pattern, site, limit as i64])?;
                while let Some(row) = rows.next()? {
                    records.push(row_to_record(row)?);
                }
            }
            None => {
                let sql = format!("{} ORDER BY url LIMIT ?2", sql_base);
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query(params![pattern, limit as i64])?;
                while let Some(row) = rows.next()? {
                    records.push(row_to_record(row)?);
                }
            }
        }

        Ok(records
            .into_iter()
            .map(|record| SearchHit {
                record,
                score: None,
            })
            .collect())
    }

    fn get_all(&self, site: Option<&str>) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        match site {
            Some(site) => {
                let sql = format!(
                    "SELECT {} FROM documents WHERE site = ?1 ORDER BY url",
                    SELECT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query(params![site])?;
                while let Some(row) = rows.next()? {
                    records.push(row_to_record(row)?);
                }
            }
            None => {
                let sql = format!("SELECT {} FROM documents ORDER BY url", SELECT_COLUMNS);
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    records.push(row_to_record(row)?);
                }
            }
        }
        Ok(records)
    }

    fn clear(&mut self, site: Option<&str>) -> StorageResult<()> {
        match site {
            Some(site) => {
                self.conn
                    .execute("DELETE FROM documents WHERE site = ?1", params![site])?;
            }
            None => {
                self.conn.execute("DELETE FROM documents", [])?;
            }
        }
        Ok(())
    }

    fn stats(&self) -> StorageResult<StoreStats> {
        let total_documents: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        let distinct_sites: u64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT site) FROM documents",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            backend: "sqlite",
            total_documents,
            distinct_sites,
        })
    }
}
