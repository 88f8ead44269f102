//! Storage module for persisting scraped documents
//!
//! Scraped pages are stored as [`DocumentRecord`]s behind the
//! [`DocumentStore`] capability trait. Two backends exist (SQLite and
//! in-memory) plus a fallback wrapper that degrades from one to the other
//! when the primary is unavailable.

mod fallback;
mod memory;
mod sqlite;
mod traits;

pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::config::{BackendKind, DatabaseConfig};
use crate::scraper::{Metadata, ScrapedPage};
use chrono::{DateTime, Utc};
use std::path::Path;

/// One persisted page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Canonical page URL; the store's unique key
    pub url: String,
    pub title: String,
    pub content: String,
    pub metadata: Metadata,
    /// Grouping key: the start URL of the session that scraped this page
    pub site: String,
    pub stored_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Builds a record from a scraped page, tagged with its site origin.
    pub fn from_page(page: &ScrapedPage, site: &str) -> Self {
        Self {
            url: page.url.to_string(),
            title: page.title.clone(),
            content: page.content.clone(),
            metadata: page.metadata.clone(),
            site: site.to_string(),
            stored_at: page.timestamp,
        }
    }
}

/// A ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: DocumentRecord,
    /// Relevance score where the backend supports one; higher is better
    pub score: Option<f64>,
}

/// Backend statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub backend: &'static str,
    pub total_documents: u64,
    pub distinct_sites: u64,
}

/// Opens the document store selected by the configuration.
///
/// With `fallback-to-memory` enabled, an unavailable SQLite database
/// degrades to the in-memory store instead of failing; any other open
/// error still propagates.
pub fn open_store(config: &DatabaseConfig) -> StorageResult<Box<dyn DocumentStore>> {
    match config.backend {
        BackendKind::Memory => Ok(Box::new(MemoryStore::new())),
        BackendKind::Sqlite => {
            if config.fallback_to_memory {
                match SqliteStore::open(Path::new(&config.sqlite_path)) {
                    Ok(primary) => Ok(Box::new(FallbackStore::new(primary, MemoryStore::new()))),
                    Err(StorageError::Unavailable(reason)) => {
                        tracing::warn!(
                            "SQLite store unavailable ({}), using in-memory store",
                            reason
                        );
                        Ok(Box::new(MemoryStore::new()))
                    }
                    Err(e) => Err(e),
                }
            } else {
                Ok(Box::new(SqliteStore::open(Path::new(&config.sqlite_path))?))
            }
        }
    }
}
