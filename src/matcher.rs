//! URL matching logic.
//!
//! Compares a captured request's URL against a stub's declared URL.

use std::collections::HashSet;

/// Whether a request URL satisfies a stub's declared URL.
///
/// Base paths must be string-equal. Query parameters are compared as an
/// unordered set of decoded `key=value` pairs: same cardinality, same pairs.
/// The stub URL is the contract, so a request with extra, missing, or
/// differing parameters does not match, and a stub declared without a query
/// string matches only requests without one.
pub fn urls_match(stub_url: &str, request_url: &str) -> bool {
    let (stub_base, stub_query) = split_url(stub_url);
    let (request_base, request_query) = split_url(request_url);

    stub_base == request_base && parse_query_pairs(stub_query) == parse_query_pairs(request_query)
}

/// Split a URL at the first `?` into base path and query string.
fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((base, query)) => (base, query),
        None => (url, ""),
    }
}

/// Parse a query string into a set of decoded key/value pairs.
fn parse_query_pairs(query: &str) -> HashSet<(String, String)> {
    let mut pairs = HashSet::new();

    for part in query.split('&') {
        if part.is_empty() {
            continue;
        }
        if let Some((key, value)) = part.split_once('=') {
            pairs.insert((urlencoding_decode(key), urlencoding_decode(value)));
        } else {
            pairs.insert((urlencoding_decode(part), String::new()));
        }
    }

    pairs
}

/// Simple URL decoding.
fn urlencoding_decode(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 {
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    result.push(byte as char);
                    continue;
                }
            }
            result.push('%');
            result.push_str(&hex);
        } else if ch == '+' {
            result.push(' ');
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_url_matching() {
        assert!(urls_match("/api/users", "/api/users"));
        assert!(!urls_match("/api/users", "/api/posts"));
    }

    #[test]
    fn test_query_order_is_irrelevant() {
        assert!(urls_match("/api?a=1&b=2", "/api?b=2&a=1"));
        assert!(urls_match("/api?baz=roa&foo=bar", "/api?foo=bar&baz=roa"));
    }

    #[test]
    fn test_extra_request_param_does_not_match() {
        assert!(!urls_match("/api?a=1", "/api?a=1&b=2"));
    }

    #[test]
    fn test_missing_request_param_does_not_match() {
        assert!(!urls_match("/api?a=1&b=2&c=3", "/api?a=1&b=2"));
    }

    #[test]
    fn test_differing_value_does_not_match() {
        assert!(!urls_match("/api?page=1", "/api?page=2"));
    }

    #[test]
    fn test_bare_stub_requires_bare_request() {
        assert!(urls_match("/api", "/api"));
        assert!(!urls_match("/api", "/api?foo=bar"));
        assert!(!urls_match("/api?foo=bar", "/api"));
    }

    #[test]
    fn test_base_path_must_match_with_equal_queries() {
        assert!(!urls_match("/api?a=1", "/other?a=1"));
    }

    #[test]
    fn test_encoded_params_compare_decoded() {
        assert!(urls_match("/search?name=John%20Doe", "/search?name=John+Doe"));
    }

    #[test]
    fn test_valueless_param() {
        assert!(urls_match("/api?flag", "/api?flag"));
        assert!(urls_match("/api?flag", "/api?flag="));
        assert!(!urls_match("/api?flag", "/api?flag=1"));
    }

    #[test]
    fn test_full_urls_with_host() {
        assert!(urls_match(
            "http://example.com/someApi",
            "http://example.com/someApi"
        ));
        assert!(!urls_match(
            "http://example.com/someApi",
            "http://example.com/someOtherApi"
        ));
    }

    #[test]
    fn test_parse_query_pairs() {
        let pairs = parse_query_pairs("foo=bar&baz=qux");
        assert!(pairs.contains(&("foo".to_string(), "bar".to_string())));
        assert!(pairs.contains(&("baz".to_string(), "qux".to_string())));

        let pairs = parse_query_pairs("name=John%20Doe");
        assert!(pairs.contains(&("name".to_string(), "John Doe".to_string())));
    }
}
