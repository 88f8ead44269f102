use crate::url::DomainScope;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for siteharvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub database: DatabaseConfig,
}

/// Crawl behavior configuration. Every tunable is explicit; there are no
/// hidden defaults read from ambient state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Maximum BFS depth from the start URL (0 crawls only the start URL)
    pub max_depth: u32,

    /// Maximum number of pages to scrape per session
    pub max_pages: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Politeness delay between consecutive fetches, in milliseconds
    pub delay_ms: u64,

    /// User agent string forwarded to the fetcher
    pub user_agent: String,

    /// Which hosts count as inside the crawled site
    pub domain_scope: DomainScope,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 50,
            timeout_secs: 10,
            delay_ms: 1000,
            user_agent: format!("siteharvest/{}", env!("CARGO_PKG_VERSION")),
            domain_scope: DomainScope::default(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// Which backend to open
    pub backend: BackendKind,

    /// Path to the SQLite database file
    pub sqlite_path: String,

    /// Wrap the SQLite store so an unavailable database degrades to the
    /// in-memory store instead of failing the session
    pub fallback_to_memory: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            sqlite_path: "./data/harvest.db".to_string(),
            fallback_to_memory: true,
        }
    }
}

/// Available document store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Memory,
}
