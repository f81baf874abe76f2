//! Crawler module for the web digest
//!
//! This module contains the page-level crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML content and link extraction
//! - The bounded, deduplicated depth-first traversal

mod fetcher;
mod parser;
mod traversal;

pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{extract_page, ExtractOptions, ExtractedPage};
pub use traversal::{crawl, ContentSection, CrawlOptions, CrawlOutput};
