use url::Url;

/// Extracts the hostname from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the hostname.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use promma::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
