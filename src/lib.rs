//! Siteharvest: a bounded same-domain web scraper
//!
//! This crate implements a breadth-first web scraper that fetches pages within
//! a single domain, extracts their text content and metadata, and hands the
//! results to a pluggable document store for later text search.

pub mod config;
pub mod scraper;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for siteharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("failed to parse URL: {0}")]
    Parse(String),

    #[error("unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Per-page fetch errors. Recorded by the frontier and never fatal to a
/// crawl session.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Per-page extraction errors, raised only when a document is too malformed
/// to parse at all. Non-fatal to the crawl session.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Result type alias for siteharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use scraper::{CrawlReport, CrawlState, Frontier, ScrapedPage};
pub use url::{normalize_url, resolve_url, same_domain, DomainScope};
