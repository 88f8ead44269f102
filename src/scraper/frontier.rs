//! Crawl frontier - the breadth-first traversal engine
//!
//! The frontier owns the visit queue, the visited set, depth bookkeeping,
//! and the page budget. It drives fetch and extract for each URL, filters
//! discovered links through the URL normalizer, and accumulates the result
//! set until a termination condition fires.

use crate::config::ScraperConfig;
use crate::scraper::extractor::Extract;
use crate::scraper::fetcher::Fetcher;
use crate::scraper::report::{CrawlFailure, CrawlReport, ScrapedPage};
use crate::url::normalize_url;
use crate::{HarvestError, UrlError};
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Lifecycle of a crawl session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// No crawl has been started
    Idle,
    /// A crawl is in progress
    Running,
    /// The crawl finished normally (queue drained, limit hit, or cancelled)
    Completed,
    /// The start URL failed validation; no pages were scraped
    Aborted,
}

/// Cooperative cancellation handle, checked once per loop iteration.
///
/// Cancelling never aborts an in-flight fetch; the session finishes the
/// current page and returns a partial `Completed` result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The traversal engine. Fetching and extraction are injected collaborators.
///
/// Each call to [`Frontier::scrape_website`] owns an independent session
/// state (queue, visited set, counters); the frontier itself is reusable.
pub struct Frontier<F, E> {
    config: ScraperConfig,
    fetcher: F,
    extractor: E,
    cancel: CancelToken,
    state: CrawlState,
}

impl<F: Fetcher, E: Extract> Frontier<F, E> {
    pub fn new(config: ScraperConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            cancel: CancelToken::new(),
            state: CrawlState::Idle,
        }
    }

    /// Returns a handle that can cancel the running crawl from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Crawls a website breadth-first starting from `start_url`.
    ///
    /// The traversal visits all same-domain pages reachable within the
    /// configured depth and page budgets, one URL at a time, with the
    /// politeness delay between consecutive fetches. Per-page fetch and
    /// extract failures are recorded and skipped.
    ///
    /// # Errors
    ///
    /// Only an invalid start URL fails the session; the frontier transitions
    /// to `Aborted` and no partial result is produced. Every other outcome
    /// is a (possibly empty) `Completed` report.
    pub async fn scrape_website(&mut self, start_url: &str) -> Result<CrawlReport, HarvestError> {
        let start = match normalize_url(start_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid start URL '{}': {}", start_url, e);
                self.state = CrawlState::Aborted;
                return Err(e.into());
            }
        };

        // The origin host fixes the crawl domain for the whole session.
        let origin_host = match start.host_str() {
            Some(host) => host.to_lowercase(),
            None => {
                self.state = CrawlState::Aborted;
                return Err(UrlError::MissingHost(start_url.to_string()).into());
            }
        };

        tracing::info!("Starting scrape of {}", start);
        self.state = CrawlState::Running;

        let mut queue: VecDeque<(Url, u32)> = VecDeque::new();
        let mut enqueued: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages: Vec<ScrapedPage> = Vec::new();
        let mut failures: Vec<CrawlFailure> = Vec::new();
        let mut max_depth_reached = 0u32;
        let mut fetched_any = false;

        enqueued.insert(start.as_str().to_string());
        queue.push_back((start, 0));

        loop {
            if pages.len() >= self.config.max_pages {
                tracing::info!("Page limit ({}) reached", self.config.max_pages);
                break;
            }
            if self.cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping with partial results");
                break;
            }
            let Some((url, depth)) = queue.pop_front() else {
                break;
            };

            // Requeued duplicates are skipped without counting against limits.
            if !visited.insert(url.as_str().to_string()) {
                continue;
            }

            // Politeness delay between consecutive fetches, regardless of
            // the previous fetch's outcome.
            if fetched_any {
                tokio::time::sleep(self.config.delay()).await;
            }
            fetched_any = true;

            tracing::info!("Scraping [{}]: {}", depth, url);

            let document = match self.fetcher.fetch(&url).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", url, e);
                    failures.push(CrawlFailure {
                        url,
                        depth,
                        error: e.into(),
                    });
                    continue;
                }
            };

            let extracted = match self.extractor.extract(&document.body, &url) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Extraction failed for {}: {}", url, e);
                    failures.push(CrawlFailure {
                        url,
                        depth,
                        error: e.into(),
                    });
                    continue;
                }
            };

            max_depth_reached = max_depth_reached.max(depth);

            if depth < self.config.max_depth {
                for link in &extracted.links {
                    let Ok(resolved) = normalize_url(link) else {
                        continue;
                    };
                    let Some(host) = resolved.host_str() else {
                        continue;
                    };
                    if !self
                        .config
                        .domain_scope
                        .permits(&origin_host, &host.to_lowercase())
                    {
                        continue;
                    }
                    let key = resolved.as_str().to_string();
                    if visited.contains(&key) || !enqueued.insert(key) {
                        continue;
                    }
                    queue.push_back((resolved, depth + 1));
                }
            }

            pages.push(ScrapedPage {
                url,
                title: extracted.title,
                content: extracted.content,
                metadata: extracted.metadata,
                links: extracted.links,
                depth,
                timestamp: Utc::now(),
            });
        }

        self.state = CrawlState::Completed;
        tracing::info!(
            "Scraping complete: {} pages, {} failures, {} URLs visited",
            pages.len(),
            failures.len(),
            visited.len()
        );

        Ok(CrawlReport {
            pages,
            failures,
            urls_visited: visited.len(),
            max_depth_reached,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::extractor::HtmlExtractor;
    use crate::scraper::fetcher::FetchedDocument;
    use crate::scraper::report::PageError;
    use crate::{DomainScope, FetchError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory fetcher mapping canonical URLs to bodies or errors, with a
    /// log of fetch order.
    struct StubFetcher {
        pages: HashMap<String, Result<String, FetchError>>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        fn new(entries: Vec<(&str, Result<&str, FetchError>)>) -> Self {
            Self {
                pages: entries
                    .into_iter()
                    .map(|(url, body)| (url.to_string(), body.map(str::to_string)))
                    .collect(),
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.log)
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
            self.log.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(Ok(body)) => Ok(FetchedDocument {
                    body: body.clone(),
                    status: 200,
                }),
                Some(Err(e)) => Err(e.clone()),
                None => Err(FetchError::Http(404)),
            }
        }
    }

    fn test_config(max_depth: u32, max_pages: usize) -> ScraperConfig {
        ScraperConfig {
            max_depth,
            max_pages,
            timeout_secs: 5,
            delay_ms: 0,
            user_agent: "test/1.0".to_string(),
            domain_scope: DomainScope::ExactHost,
        }
    }

    fn html(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        format!(
            "<html><head><title>T</title></head><body><p>body</p>{}</body></html>",
            anchors
        )
    }

    #[tokio::test]
    async fn test_bfs_order_and_depths() {
        // / -> a, b ; a -> c
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/a", "/b"]))),
            ("https://example.com/a", Ok(&html(&["/c"]))),
            ("https://example.com/b", Ok(&html(&[]))),
            ("https://example.com/c", Ok(&html(&[]))),
        ]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(2, 50), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        let order: Vec<String> = log.lock().unwrap().clone();
        assert_eq!(
            order,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
        );
        let depths: Vec<u32> = report.pages.iter().map(|p| p.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2]);
        assert_eq!(report.max_depth_reached, 2);
        assert_eq!(frontier.state(), CrawlState::Completed);
    }

    #[tokio::test]
    async fn test_max_depth_zero_crawls_only_start() {
        let fetcher = StubFetcher::new(vec![(
            "https://example.com/",
            Ok(&html(&["/a", "/b", "/c"])),
        )]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(0, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].depth, 0);
        // Links are still recorded on the page even though none are followed.
        assert_eq!(report.pages[0].links.len(), 3);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_budget_stops_immediately() {
        let fetcher = StubFetcher::new(vec![
            (
                "https://example.com/",
                Ok(&html(&["/a", "/b", "/c", "/d", "/e"])),
            ),
            ("https://example.com/a", Ok(&html(&[]))),
        ]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(2, 1), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(log.lock().unwrap().len(), 1, "no link may be fetched");
    }

    #[tokio::test]
    async fn test_self_loop_visited_once() {
        let fetcher = StubFetcher::new(vec![(
            "https://example.com/",
            Ok(&html(&["https://example.com/", "/"])),
        )]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(3, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(report.urls_visited, 1);
    }

    #[tokio::test]
    async fn test_mutual_links_fetched_once_each() {
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/a"]))),
            ("https://example.com/a", Ok(&html(&["/", "/a"]))),
        ]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(5, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_off_domain_links_discovered_but_not_fetched() {
        let fetcher = StubFetcher::new(vec![(
            "https://example.com/",
            Ok(&html(&["https://other.com/page", "https://blog.example.com/"])),
        )]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        // Off-domain and subdomain links are reported on the page...
        assert_eq!(report.pages[0].links.len(), 2);
        // ...but never fetched.
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subdomains_followed_when_scope_allows() {
        let fetcher = StubFetcher::new(vec![
            (
                "https://example.com/",
                Ok(&html(&["https://blog.example.com/post"])),
            ),
            ("https://blog.example.com/post", Ok(&html(&[]))),
        ]);

        let mut config = test_config(2, 10);
        config.domain_scope = DomainScope::IncludeSubdomains;
        let mut frontier = Frontier::new(config, fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failures_are_absorbed() {
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/broken", "/ok"]))),
            ("https://example.com/broken", Err(FetchError::Timeout)),
            ("https://example.com/ok", Ok(&html(&[]))),
        ]);

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].depth, 1);
        assert!(matches!(
            report.failures[0].error,
            PageError::Fetch(FetchError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_all_links_failing_still_completes() {
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/a", "/b"]))),
            ("https://example.com/a", Err(FetchError::Timeout)),
            ("https://example.com/b", Err(FetchError::Timeout)),
        ]);

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(frontier.state(), CrawlState::Completed);
    }

    #[tokio::test]
    async fn test_extract_failure_is_per_page() {
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/empty"]))),
            // Whitespace-only body trips the extractor's malformed check.
            ("https://example.com/empty", Ok("   ")),
        ]);

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, PageError::Extract(_)));
    }

    #[tokio::test]
    async fn test_invalid_start_url_aborts() {
        let fetcher = StubFetcher::new(vec![]);
        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);

        let result = frontier.scrape_website("not a url").await;
        assert!(matches!(result, Err(HarvestError::InvalidUrl(_))));
        assert_eq!(frontier.state(), CrawlState::Aborted);
    }

    #[tokio::test]
    async fn test_pre_cancelled_session_returns_empty_completed() {
        let fetcher = StubFetcher::new(vec![("https://example.com/", Ok(&html(&[])))]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        frontier.cancel_token().cancel();

        let report = frontier.scrape_website("https://example.com").await.unwrap();
        assert!(report.pages.is_empty());
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(frontier.state(), CrawlState::Completed);
    }

    #[tokio::test]
    async fn test_trailing_slash_variants_deduplicated() {
        // "/a" and "/a/" normalize to the same canonical URL.
        let fetcher = StubFetcher::new(vec![
            ("https://example.com/", Ok(&html(&["/a", "/a/"]))),
            ("https://example.com/a", Ok(&html(&[]))),
        ]);
        let log = fetcher.log_handle();

        let mut frontier = Frontier::new(test_config(2, 10), fetcher, HtmlExtractor);
        let report = frontier.scrape_website("https://example.com").await.unwrap();

        assert_eq!(report.pages.len(), 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
