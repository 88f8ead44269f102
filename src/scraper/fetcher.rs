//! HTTP fetcher implementation
//!
//! The frontier talks to the network through the [`Fetcher`] trait so the
//! HTTP client stays an injected collaborator. [`HttpFetcher`] is the
//! production implementation backed by reqwest; tests substitute their own.

use crate::FetchError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A raw document retrieved from a URL.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Response body as text
    pub body: String,
    /// HTTP status code of the final response
    pub status: u16,
}

/// Boundary to the HTTP collaborator: one bounded-timeout retrieval per call.
///
/// A single attempt is made per URL; retry policy is deliberately not part
/// of this contract.
pub trait Fetcher {
    fn fetch(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<FetchedDocument, FetchError>> + Send;
}

/// Production fetcher backed by a reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the given user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_error)?;

        Ok(FetchedDocument {
            body,
            status: status.as_u16(),
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy.
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Network("connection failed".to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}
