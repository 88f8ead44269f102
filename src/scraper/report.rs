//! Crawl result set and summary statistics
//!
//! A [`CrawlReport`] is the ordered, append-only outcome of one crawl
//! session: the successfully extracted pages, the per-page failures that
//! were absorbed along the way, and counters for the session summary.

use crate::scraper::extractor::Metadata;
use crate::url::extract_host;
use crate::{ExtractError, FetchError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use url::Url;

/// One successfully retrieved and extracted document.
///
/// Created once per successful fetch+extract and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// Canonical absolute URL, unique within a crawl session
    pub url: Url,
    /// Extracted page title, possibly empty
    pub title: String,
    /// Cleaned plain-text body
    pub content: String,
    /// Meta tags and heading structure
    pub metadata: Metadata,
    /// Outbound links in first-seen order; may include off-domain URLs
    pub links: Vec<String>,
    /// BFS distance from the start URL
    pub depth: u32,
    /// Extraction time
    pub timestamp: DateTime<Utc>,
}

/// The reason a single page was skipped.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// A recorded per-page failure. Diagnostic only; never aborts the session.
#[derive(Debug, Clone)]
pub struct CrawlFailure {
    pub url: Url,
    pub depth: u32,
    pub error: PageError,
}

/// The accumulated outcome of one crawl session.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Pages in the order they were scraped (BFS order)
    pub pages: Vec<ScrapedPage>,
    /// Per-page failures absorbed during the session
    pub failures: Vec<CrawlFailure>,
    /// Number of distinct URLs dequeued for processing
    pub urls_visited: usize,
    /// High-water mark of page depth among scraped pages
    pub max_depth_reached: u32,
}

impl CrawlReport {
    /// Computes summary statistics for the session.
    pub fn summary(&self) -> CrawlSummary {
        let total_content_length = self.pages.iter().map(|p| p.content.len()).sum();

        // Distinct domains among the recorded pages' outbound links.
        let unique_domains = self
            .pages
            .iter()
            .flat_map(|p| p.links.iter())
            .filter_map(|link| Url::parse(link).ok())
            .filter_map(|url| extract_host(&url))
            .collect::<HashSet<_>>()
            .len();

        CrawlSummary {
            total_pages: self.pages.len(),
            total_urls_visited: self.urls_visited,
            max_depth_reached: self.max_depth_reached,
            total_content_length,
            unique_domains,
        }
    }
}

/// Summary statistics derived from a crawl report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub total_pages: usize,
    pub total_urls_visited: usize,
    pub max_depth_reached: u32,
    pub total_content_length: usize,
    pub unique_domains: usize,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total_pages: {}", self.total_pages)?;
        writeln!(f, "total_urls_visited: {}", self.total_urls_visited)?;
        writeln!(f, "max_depth_reached: {}", self.max_depth_reached)?;
        writeln!(f, "total_content_length: {}", self.total_content_length)?;
        write!(f, "unique_domains: {}", self.unique_domains)
    }
}
