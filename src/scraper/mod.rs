//! Scraper module: fetching, extraction, and breadth-first traversal
//!
//! The frontier is the core engine; the fetcher and extractor are injected
//! collaborators behind traits so the HTTP client and HTML parser stay at
//! the boundary.

mod extractor;
mod fetcher;
mod frontier;
mod report;

pub use extractor::{Extract, ExtractedContent, HtmlExtractor, MetaValue, Metadata};
pub use fetcher::{FetchedDocument, Fetcher, HttpFetcher};
pub use frontier::{CancelToken, CrawlState, Frontier};
pub use report::{CrawlFailure, CrawlReport, CrawlSummary, PageError, ScrapedPage};

use crate::config::ScraperConfig;
use crate::Result;

/// Builds a production frontier (reqwest fetcher, scraper-crate extractor)
/// from the given configuration.
pub fn build_frontier(config: ScraperConfig) -> Result<Frontier<HttpFetcher, HtmlExtractor>> {
    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())?;
    Ok(Frontier::new(config, fetcher, HtmlExtractor))
}

/// Runs a complete crawl session with the production collaborators.
///
/// # Example
///
/// ```no_run
/// use siteharvest::config::ScraperConfig;
/// use siteharvest::scraper::scrape_website;
///
/// # async fn example() -> siteharvest::Result<()> {
/// let report = scrape_website(ScraperConfig::default(), "https://example.com").await?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub async fn scrape_website(config: ScraperConfig, start_url: &str) -> Result<CrawlReport> {
    let mut frontier = build_frontier(config)?;
    frontier.scrape_website(start_url).await
}
