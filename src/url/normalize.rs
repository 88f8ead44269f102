use crate::{UrlError, UrlResult};
use url::Url;

/// Checks whether a string parses into a URL with an HTTP(S) scheme and a host.
///
/// # Examples
///
/// ```
/// use siteharvest::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com"));
/// assert!(!is_valid_url("not a url"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            (url.scheme() == "http" || url.scheme() == "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Normalizes a raw URL string into its canonical form.
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Add a default `https://` scheme if no scheme is present
/// 3. Parse; reject if malformed or missing a host
/// 4. Lowercase scheme and host (performed by the parser)
/// 5. Drop the fragment identifier
/// 6. Strip the trailing slash from non-root paths
///
/// Normalization is idempotent: `normalize_url(x.as_str())` returns `x` for
/// any already-normalized `x`.
///
/// # Examples
///
/// ```
/// use siteharvest::url::normalize_url;
///
/// let url = normalize_url("EXAMPLE.com/page/#section").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        let scheme = trimmed.split("://").next().unwrap_or("").to_string();
        return Err(UrlError::InvalidScheme(scheme));
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let stripped = path.trim_end_matches('/').to_string();
        url.set_path(&stripped);
    }

    Ok(url)
}

/// Resolves a possibly-relative link against a base URL.
///
/// An empty `relative` returns the base unchanged, matching how browsers
/// treat `href=""`.
pub fn resolve_url(base: &Url, relative: &str) -> UrlResult<Url> {
    let relative = relative.trim();
    if relative.is_empty() {
        return Ok(base.clone());
    }
    base.join(relative).map_err(|e| UrlError::Parse(e.to_string()))
}
