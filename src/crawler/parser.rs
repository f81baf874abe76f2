//! HTML content extraction
//!
//! Turns a fetched page into plain-text content and the same-domain links
//! it points at.

use crate::url::{extract_domain, is_same_domain, resolve_link};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose full text is content
const CONTENT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "li"];

/// Generic containers whose own text counts in recursive mode
const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "span", "td", "blockquote", "pre",
];

/// Extraction switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also take the direct text of generic containers
    pub include_containers: bool,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Content lines joined with `\n`, empty if the page had none
    pub text: String,

    /// Absolute same-domain links in document order, without duplicates
    pub links: Vec<Url>,
}

impl ExtractedPage {
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Extracts text and same-domain links from a page
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was requested from, used to resolve links
/// * `seed_host` - Hostname of the crawl's seed; only links on it or its subdomains are kept
/// * `options` - Extraction switches
///
/// # Example
///
/// ```
/// use promma::crawler::{extract_page, ExtractOptions};
/// use url::Url;
///
/// let html = r#"<h1>Intro</h1><p>Hello</p><a href="/next">next</a><a href="https://other.org/">x</a>"#;
/// let base = Url::parse("https://example.com/intro").unwrap();
/// let page = extract_page(html, &base, "example.com", ExtractOptions::default());
/// assert_eq!(page.text, "Intro\nHello");
/// assert_eq!(page.links.len(), 1);
/// assert_eq!(page.links[0].as_str(), "https://example.com/next");
/// ```
pub fn extract_page(
    html: &str,
    base_url: &Url,
    seed_host: &str,
    options: ExtractOptions,
) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        text: extract_text(&document, options),
        links: extract_links(&document, base_url, seed_host),
    }
}

fn extract_text(document: &Html, options: ExtractOptions) -> String {
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let name = element.value().name();

        let text = if CONTENT_TAGS.contains(&name) {
            element.text().collect::<String>()
        } else if options.include_containers && CONTAINER_TAGS.contains(&name) {
            own_text(element)
        } else {
            continue;
        };

        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    lines.join("\n")
}

/// Text nodes that are direct children of the element
///
/// Nested elements are skipped so container text never repeats the text
/// of the content elements inside it.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_links(document: &Html, base_url: &Url, seed_host: &str) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };
        let Some(host) = extract_domain(&url) else {
            continue;
        };
        if !is_same_domain(&host, seed_host) {
            continue;
        }
        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    }

    links
}
