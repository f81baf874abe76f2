//! URL handling module for Promma
//!
//! This module provides seed URL parsing, hostname extraction, link
//! resolution and the same-domain rule that scopes every crawl.

mod domain;
mod matcher;
mod resolve;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::is_same_domain;
pub use resolve::resolve_link;

/// A parsed seed URL together with the hostname that bounds its crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUrl {
    /// The parsed seed URL
    pub url: Url,

    /// Lowercase hostname of the seed; links must match it to be followed
    pub host: String,
}

/// Parses a user-supplied seed URL
///
/// Only `http` and `https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use promma::parse_seed_url;
///
/// let seed = parse_seed_url("https://Docs.Example.com/intro").unwrap();
/// assert_eq!(seed.host, "docs.example.com");
///
/// assert!(parse_seed_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_seed_url(raw: &str) -> UrlResult<SeedUrl> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{raw}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = extract_domain(&url).ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;

    Ok(SeedUrl { url, host })
}
