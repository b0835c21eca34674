use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// First `http://` or `https://` URL in a memo, up to the next whitespace.
pub fn extract_link(memo: &str) -> Option<&str> {
    URL_PATTERN.find(memo).map(|found| found.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_url_only() {
        assert_eq!(
            extract_link("see https://example.com/a and http://example.com/b"),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn url_stops_at_whitespace() {
        assert_eq!(
            extract_link("ref:http://intra.net/x?y=1\tnext"),
            Some("http://intra.net/x?y=1")
        );
    }

    #[test]
    fn absent_without_scheme() {
        assert_eq!(extract_link("www.example.com"), None);
        assert_eq!(extract_link("ftp://example.com"), None);
        assert_eq!(extract_link("https://"), None);
        assert_eq!(extract_link(""), None);
    }
}
