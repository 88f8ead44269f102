//! URL handling module for siteharvest
//!
//! Provides URL validation, normalization, base-relative resolution, and
//! same-domain membership checks. All functions here are pure.

mod normalize;

pub use normalize::{is_valid_url, normalize_url, resolve_url};

use serde::{Deserialize, Serialize};
use url::Url;

/// Extracts the lowercase host from a URL, if present.
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether two URLs share the same host.
///
/// The comparison is exact: `blog.example.com` and `example.com` are
/// different domains. Subdomain handling is controlled separately by
/// [`DomainScope`].
///
/// # Examples
///
/// ```
/// use url::Url;
/// use siteharvest::url::same_domain;
///
/// let a = Url::parse("https://example.com/page1").unwrap();
/// let b = Url::parse("https://example.com/page2").unwrap();
/// let c = Url::parse("https://blog.example.com/").unwrap();
/// assert!(same_domain(&a, &b));
/// assert!(!same_domain(&a, &c));
/// ```
pub fn same_domain(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}

/// Policy controlling which hosts count as "inside" the crawled site.
///
/// The exact-host default is the conservative choice; widening to
/// subdomains is an explicit opt-in via configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainScope {
    /// Only the origin host itself is in scope.
    #[default]
    ExactHost,
    /// The origin host and any of its subdomains are in scope.
    IncludeSubdomains,
}

impl DomainScope {
    /// Returns true if `candidate` is within the crawl scope anchored at
    /// `origin`. Both hosts are expected lowercase.
    pub fn permits(&self, origin: &str, candidate: &str) -> bool {
        match self {
            Self::ExactHost => origin == candidate,
            Self::IncludeSubdomains => {
                candidate == origin || candidate.ends_with(&format!(".{}", origin))
            }
        }
    }
}
