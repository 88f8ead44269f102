//! Fallback store wrapper
//!
//! Routes every operation to the primary backend until one of them fails
//! with [`StorageError::Unavailable`]. From that point on all operations go
//! to the secondary backend. Documents already written to the primary are
//! not replayed into the secondary. Errors of any other class propagate
//! without triggering the switch.

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{DocumentRecord, SearchHit, StoreStats};
use std::sync::atomic::{AtomicBool, Ordering};

/// Wraps a primary and secondary store, degrading to the secondary when the
/// primary becomes unavailable.
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
    degraded: AtomicBool,
}

impl<P: DocumentStore, S: DocumentStore> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self {
            primary,
            secondary,
            degraded: AtomicBool::new(false),
        }
    }

    fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Inspects a primary-store result. On `Unavailable` the wrapper flips
    /// to degraded mode and signals the caller to retry on the secondary.
    fn note_result<T>(&self, result: StorageResult<T>) -> Result<StorageResult<T>, ()> {
        match result {
            Err(StorageError::Unavailable(reason)) => {
                tracing::warn!(
                    "Primary store unavailable ({}), switching to fallback",
                    reason
                );
                self.degraded.store(true, Ordering::Relaxed);
                Err(())
            }
            other => Ok(other),
        }
    }
}

impl<P: DocumentStore, S: DocumentStore> DocumentStore for FallbackStore<P, S> {
    fn add_documents(&mut self, records: &[DocumentRecord]) -> StorageResult<()> {
        if !self.is_degraded() {
            let result = self.primary.add_documents(records);
            if let Ok(result) = self.note_result(result) {
                return result;
            }
        }
        self.secondary.add_documents(records)
    }

    fn search(
        &self,
        query: &str,
        limit: usize,
        site: Option<&str>,
    ) -> StorageResult<Vec<SearchHit>> {
        if !self.is_degraded() {
            let result = self.primary.search(query, limit, site);
            if let Ok(result) = self.note_result(result) {
                return result;
            }
        }
        self.secondary.search(query, limit, site)
    }

    fn get_all(&self, site: Option<&str>) -> StorageResult<Vec<DocumentRecord>> {
        if !self.is_degraded() {
            let result = self.primary.get_all(site);
            if let Ok(result) = self.note_result(result) {
                return result;
            }
        }
        self.secondary.get_all(site)
    }

    fn clear(&mut self, site: Option<&str>) -> StorageResult<()> {
        if !self.is_degraded() {
            let result = self.primary.clear(site);
            if let Ok(result) = self.note_result(result) {
                return result;
            }
        }
        self.secondary.clear(site)
    }

    fn stats(&self) -> StorageResult<StoreStats> {
        if !self.is_degraded() {
            let result = self.primary.stats();
            if let Ok(result) = self.note_result(result) {
                return result;
            }
        }
        self.secondary.stats()
    }
}
