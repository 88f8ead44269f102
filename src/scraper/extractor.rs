//! Content extraction from raw HTML
//!
//! The frontier receives parsed page content through the [`Extract`] trait;
//! [`HtmlExtractor`] is the production implementation backed by the
//! `scraper` crate. Extraction produces the page title, a cleaned plain-text
//! body, a metadata map, and the outbound link set.

use crate::url::resolve_url;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// Elements whose text never belongs in the extracted body.
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "template",
];

/// Elements that introduce a paragraph boundary in the extracted text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "blockquote", "li", "h1", "h2", "h3", "h4", "h5",
    "h6", "tr", "br", "ul", "ol", "table",
];

/// Link schemes that are never crawlable document links.
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// A single metadata value: a closed set of shapes rather than an open
/// dynamic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Flag(bool),
    Number(f64),
    List(Vec<String>),
    Text(String),
}

/// Metadata map attached to a scraped page.
pub type Metadata = BTreeMap<String, MetaValue>;

/// Structured content extracted from one HTML document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Page title; empty when the document has none
    pub title: String,
    /// Cleaned plain-text body
    pub content: String,
    /// Recognized meta tags and heading structure
    pub metadata: Metadata,
    /// Absolute outbound link URLs, deduplicated in first-seen order
    pub links: Vec<String>,
}

/// Boundary to the HTML-parsing collaborator.
pub trait Extract {
    fn extract(&self, html: &str, page_url: &Url) -> Result<ExtractedContent, ExtractError>;
}

/// Production extractor backed by the `scraper` HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extract for HtmlExtractor {
    fn extract(&self, html: &str, page_url: &Url) -> Result<ExtractedContent, ExtractError> {
        if html.trim().is_empty() {
            return Err(ExtractError::Malformed("empty document".to_string()));
        }

        let document = Html::parse_document(html);

        Ok(ExtractedContent {
            title: extract_title(&document),
            content: extract_content(&document),
            metadata: extract_metadata(&document),
            links: extract_links(&document, page_url),
        })
    }
}

/// Extracts the page title: the `<title>` element, falling back to the
/// first `<h1>`, else empty.
fn extract_title(document: &Html) -> String {
    for selector_str in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

/// Extracts the cleaned text body.
///
/// Text inside script/style/navigation/footer regions is excluded,
/// whitespace is collapsed, and block-level boundaries become single
/// newlines.
fn extract_content(document: &Html) -> String {
    let mut raw = String::new();

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next());

    match body {
        Some(element) => collect_text(element, &mut raw),
        None => collect_text(document.root_element(), &mut raw),
    }

    // Collapse runs of whitespace within lines and drop empty lines.
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recursively collects text nodes, skipping excluded subtrees and marking
/// block boundaries with newlines.
fn collect_text(element: ElementRef, out: &mut String) {
    let tag = element.value().name();
    if EXCLUDED_TAGS.contains(&tag) {
        return;
    }

    let block = BLOCK_TAGS.contains(&tag);
    if block {
        out.push('\n');
    }

    for child in element.children() {
        match child.value() {
            scraper::node::Node::Text(text) => {
                let trimmed = text.text.trim();
                if !trimmed.is_empty() {
                    out.push_str(trimmed);
                    out.push(' ');
                }
            }
            scraper::node::Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }

    if block {
        out.push('\n');
    }
}

/// Collects recognized meta tags plus heading texts grouped by level.
fn extract_metadata(document: &Html) -> Metadata {
    let mut metadata = Metadata::new();

    if let Ok(meta_selector) = Selector::parse("meta") {
        for element in document.select(&meta_selector) {
            let name = element
                .value()
                .attr("name")
                .or_else(|| element.value().attr("property"))
                .unwrap_or("");
            let content = element.value().attr("content").unwrap_or("");

            if content.is_empty() || !is_recognized_meta(name) {
                continue;
            }
            metadata.insert(name.to_string(), MetaValue::Text(content.to_string()));
        }
    }

    for level in 1..=6u8 {
        let selector_str = format!("h{}", level);
        let parsed = Selector::parse(&selector_str);
        if let Ok(selector) = parsed {
            let headings: Vec<String> = document
                .select(&selector)
                .map(|h| h.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !headings.is_empty() {
                metadata.insert(selector_str.clone(), MetaValue::List(headings));
            }
        }
    }

    metadata
}

fn is_recognized_meta(name: &str) -> bool {
    matches!(name, "description" | "keywords" | "author") || name.starts_with("og:")
}

/// Extracts every hyperlink target, resolved to absolute form and
/// deduplicated in first-seen order. Off-domain links are kept; domain
/// filtering is the frontier's job.
fn extract_links(document: &Html, page_url: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();

            if href.is_empty() || href.starts_with('#') {
                continue;
            }
            if SKIPPED_SCHEMES.iter().any(|s| href.starts_with(s)) {
                continue;
            }

            let Ok(absolute) = resolve_url(page_url, href) else {
                continue;
            };
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                continue;
            }

            let link = absolute.to_string();
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extract(html: &str) -> ExtractedContent {
        HtmlExtractor.extract(html, &page_url()).unwrap()
    }

    #[test]
    fn test_title_from_title_tag() {
        let content = extract("<html><head><title> My Page </title></head><body></body></html>");
        assert_eq!(content.title, "My Page");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let content = extract("<html><body><h1>Heading Title</h1></body></html>");
        assert_eq!(content.title, "Heading Title");
    }

    #[test]
    fn test_title_empty_when_absent() {
        let content = extract("<html><body><p>no title here</p></body></html>");
        assert_eq!(content.title, "");
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let result = HtmlExtractor.extract("   ", &page_url());
        assert!(matches!(result, Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn test_script_and_style_excluded() {
        let html = r#"<html><body>
            <p>visible text</p>
            <script>var hidden = 1;</script>
            <style>.hidden { color: red; }</style>
            <nav>nav text</nav>
            <footer>footer text</footer>
            <aside>aside text</aside>
        </body></html>"#;
        let content = extract(html);
        assert!(content.content.contains("visible text"));
        assert!(!content.content.contains("hidden"));
        assert!(!content.content.contains("nav text"));
        assert!(!content.content.contains("footer text"));
        assert!(!content.content.contains("aside text"));
    }

    #[test]
    fn test_whitespace_collapsed_with_paragraph_boundaries() {
        let html = "<html><body><p>first   paragraph\n  here</p><p>second</p></body></html>";
        let content = extract(html);
        assert_eq!(content.content, "first paragraph here\nsecond");
    }

    #[test]
    fn test_meta_tags_collected() {
        let html = r#"<html><head>
            <meta name="description" content="A test page">
            <meta name="keywords" content="rust, crawling">
            <meta name="author" content="somebody">
            <meta property="og:title" content="OG Title">
            <meta name="viewport" content="width=device-width">
        </head><body></body></html>"#;
        let content = extract(html);
        assert_eq!(
            content.metadata.get("description"),
            Some(&MetaValue::Text("A test page".to_string()))
        );
        assert_eq!(
            content.metadata.get("og:title"),
            Some(&MetaValue::Text("OG Title".to_string()))
        );
        // Unrecognized meta names are dropped.
        assert!(!content.metadata.contains_key("viewport"));
    }

    #[test]
    fn test_headings_grouped_by_level() {
        let html = r#"<html><body>
            <h1>Top</h1>
            <h2>First section</h2>
            <h2>Second section</h2>
        </body></html>"#;
        let content = extract(html);
        assert_eq!(
            content.metadata.get("h1"),
            Some(&MetaValue::List(vec!["Top".to_string()]))
        );
        assert_eq!(
            content.metadata.get("h2"),
            Some(&MetaValue::List(vec![
                "First section".to_string(),
                "Second section".to_string()
            ]))
        );
        assert!(!content.metadata.contains_key("h3"));
    }

    #[test]
    fn test_links_resolved_and_deduplicated() {
        let html = r#"<html><body>
            <a href="/about">About</a>
            <a href="other">Other</a>
            <a href="/about">About again</a>
            <a href="https://elsewhere.com/page">External</a>
        </body></html>"#;
        let content = extract(html);
        assert_eq!(
            content.links,
            vec![
                "https://example.com/about",
                "https://example.com/other",
                "https://elsewhere.com/page",
            ]
        );
    }

    #[test]
    fn test_non_document_links_skipped() {
        let html = r##"<html><body>
            <a href="#section">Anchor</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:x@example.com">Mail</a>
            <a href="tel:+123">Phone</a>
            <a href="data:text/plain,hi">Data</a>
            <a href="/real">Real</a>
        </body></html>"##;
        let content = extract(html);
        assert_eq!(content.links, vec!["https://example.com/real"]);
    }

    #[test]
    fn test_page_with_no_links() {
        let content = extract("<html><body><p>plain text only</p></body></html>");
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_meta_value_json_shapes() {
        let list = MetaValue::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);

        let text = MetaValue::Text("hello".to_string());
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""hello""#);

        let parsed: MetaValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, MetaValue::Flag(true));
    }
}
