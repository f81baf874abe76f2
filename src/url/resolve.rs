use url::Url;

/// Resolves a link href to an absolute URL against the page it appeared on
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_absolute_link() {
        let url = resolve_link("https://other.com/x", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_root_relative_link() {
        let url = resolve_link("/other", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_path_relative_link() {
        let url = resolve_link("sibling", &base_url()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/sibling");
    }

    #[test]
    fn test_skipped_schemes() {
        for href in [
            "javascript:void(0)",
            "mailto:a@example.com",
            "tel:+123",
            "data:text/html,hi",
            "JavaScript:alert(1)",
        ] {
            assert!(resolve_link(href, &base_url()).is_none(), "{href}");
        }
    }

    #[test]
    fn test_fragment_only_and_empty() {
        assert!(resolve_link("#section", &base_url()).is_none());
        assert!(resolve_link("   ", &base_url()).is_none());
    }

    #[test]
    fn test_unresolvable_href_is_dropped() {
        assert!(resolve_link("http://[::1", &base_url()).is_none());
    }
}
