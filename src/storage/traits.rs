//! Storage trait and error types

use crate::storage::{DocumentRecord, SearchHit, StoreStats};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached or opened. This is the only error
    /// class the fallback wrapper reacts to.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _) => match err.code {
                rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DatabaseLocked => Self::Unavailable(e.to_string()),
                _ => Self::Database(e.to_string()),
            },
            _ => Self::Database(e.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Capability interface for document store backends.
///
/// A store persists extracted pages keyed by URL and serves text queries
/// over them, optionally filtered by the site grouping key.
pub trait DocumentStore {
    /// Inserts or replaces documents, keyed by URL.
    fn add_documents(&mut self, records: &[DocumentRecord]) -> StorageResult<()>;

    /// Returns up to `limit` documents matching `query`, best first.
    /// The relevance score is present only where the backend computes one.
    fn search(
        &self,
        query: &str,
        limit: usize,
        site: Option<&str>,
    ) -> StorageResult<Vec<SearchHit>>;

    /// Returns all documents, optionally restricted to one site.
    fn get_all(&self, site: Option<&str>) -> StorageResult<Vec<DocumentRecord>>;

    /// Deletes one site's documents, or everything when `site` is None.
    fn clear(&mut self, site: Option<&str>) -> StorageResult<()>;

    /// Returns backend statistics.
    fn stats(&self) -> StorageResult<StoreStats>;
}
