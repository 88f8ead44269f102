//! In-memory document store
//!
//! Keeps documents in a `BTreeMap` keyed by URL. Search ranks documents by
//! the number of case-insensitive query occurrences in the title and
//! content. Contents are lost when the process exits.

use crate::storage::traits::{DocumentStore, StorageResult};
use crate::storage::{DocumentRecord, SearchHit, StoreStats};
use std::collections::{BTreeMap, HashSet};

/// Volatile document store backed by a sorted map
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: BTreeMap<String, DocumentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn occurrence_score(record: &DocumentRecord, query: &str) -> usize {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let title = record.title.to_lowercase();
    let content = record.content.to_lowercase();
    title.matches(&needle).count() + content.matches(&needle).count()
}

impl DocumentStore for MemoryStore {
    fn add_documents(&mut self, records: &[DocumentRecord]) -> StorageResult<()> {
        for record in records {
            self.docs.insert(record.url.clone(), record.clone());
        }
        tracing::debug!("Stored {} documents in memory", records.len());
        Ok(())
    }

    fn search(
        &self,
        query: &str,
        limit: usize,
        site: Option<&str>,
    ) -> StorageResult<Vec<SearchHit>> {
        let mut scored: Vec<(usize, &DocumentRecord)> = self
            .docs
            .values()
            .filter(|record| site.map_or(true, |s| record.site == s))
            .map(|record| (occurrence_score(record, query), record))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Highest score first; ties break on URL for stable output.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.url.cmp(&b.1.url)));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, record)| SearchHit {
                record: record.clone(),
                score: Some(score as f64),
            })
            .collect())
    }

    fn get_all(&self, site: Option<&str>) -> StorageResult<Vec<DocumentRecord>> {
        Ok(self
            .docs
            .values()
            .filter(|record| site.map_or(true, |s| record.site == s))
            .cloned()
            .collect())
    }

    fn clear(&mut self, site: Option<&str>) -> StorageResult<()> {
        match site {
            Some(site) => self.docs.retain(|_, record| record.site != site),
            None => self.docs.clear(),
        }
        Ok(())
    }

    fn stats(&self) -> StorageResult<StoreStats> {
        let distinct_sites = self
            .docs
            .values()
            .map(|record| record.site.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        Ok(StoreStats {
            backend: "memory",
            total_documents: self.docs.len() as u64,
            distinct_sites,
        })
    }
}
