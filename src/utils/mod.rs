//! Utility functions and helpers.

pub mod http;
pub mod rate;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://dayz.fandom.com/wiki/").unwrap();
        assert_eq!(
            resolve_url(&base, "FX-45"),
            "https://dayz.fandom.com/wiki/FX-45"
        );
        assert_eq!(
            resolve_url(&base, "/wiki/Canteen"),
            "https://dayz.fandom.com/wiki/Canteen"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://static.wikia.nocookie.net/dayz/images/a.png"),
            Some("static.wikia.nocookie.net".to_string())
        );
        assert_eq!(get_domain("not a url"), None);
    }
}
