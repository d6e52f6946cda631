use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `href` value of an `<a ...>` tag, quoted with either `"` or `'`.
/// Group 1 holds a double-quoted value, group 2 a single-quoted one.
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+(?:[^>]*?\s+)?href\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("hardcoded regex pattern is valid")
});

/// Extracts the distinct `href` values of anchor tags in `body`.
///
/// Values are deduplicated case-insensitively. The first spelling seen wins and
/// entries come back in discovery order, though callers should treat the result
/// as an unordered set. Malformed markup yields fewer matches, never an error.
pub fn extract_links(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in ANCHOR_HREF.captures_iter(body) {
        let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let href = value.as_str();

        if seen.insert(href.to_lowercase()) {
            links.push(href.to_string());
        }
    }

    links
}
