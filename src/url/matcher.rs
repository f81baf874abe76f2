/// Checks whether a link's hostname belongs to the seed's domain
///
/// A hostname qualifies when it equals the seed hostname or is a dot-suffixed
/// subdomain of it. There is no public-suffix awareness: `notexample.com` does
/// not match `example.com`, but any `*.example.com` does.
///
/// # Examples
///
/// ```
/// use promma::is_same_domain;
///
/// assert!(is_same_domain("example.com", "example.com"));
/// assert!(is_same_domain("sub.example.com", "example.com"));
/// assert!(!is_same_domain("notexample.com", "example.com"));
/// assert!(!is_same_domain("example.com", "sub.example.com"));
/// ```
pub fn is_same_domain(host: &str, seed_host: &str) -> bool {
    if host == seed_host {
        return true;
    }

    host.len() > seed_host.len()
        && host.ends_with(seed_host)
        && host.as_bytes()[host.len() - seed_host.len() - 1] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(is_same_domain("example.com", "example.com"));
        assert!(is_same_domain("a.example.com", "a.example.com"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(is_same_domain("blog.example.com", "example.com"));
        assert!(is_same_domain("deep.sub.a.example.com", "a.example.com"));
    }

    #[test]
    fn test_suffix_without_dot_boundary() {
        assert!(!is_same_domain("notexample.com", "example.com"));
        assert!(!is_same_domain("xa.example.com", "a.example.com"));
    }

    #[test]
    fn test_parent_and_sibling_do_not_match() {
        assert!(!is_same_domain("example.com", "a.example.com"));
        assert!(!is_same_domain("b.example.com", "a.example.com"));
        assert!(!is_same_domain("b.other.com", "a.example.com"));
    }
}
