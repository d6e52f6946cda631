use crate::error::{CrawlError, Result};
use url::Url;

/// Serializes a URL without its fragment, the form kept in the visited set.
pub fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Normalizes a URL string if it parses, otherwise returns it untouched.
pub fn normalize_url_str(url: &str) -> String {
    Url::parse(url)
        .map(|u| normalize_url(&u))
        .unwrap_or_else(|_| url.to_string())
}

pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn starts_with_http(link: &str) -> bool {
    link.get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

/// Turns a raw link into an absolute URL.
///
/// Links starting with `http` (any case) are parsed as absolute; everything else
/// is joined onto `base`. Either kind of parse failure is a resolution error.
pub fn resolve_link(base: &str, link: &str) -> Result<Url> {
    let resolution_error = |source| CrawlError::UrlResolution {
        base: base.to_string(),
        link: link.to_string(),
        source,
    };

    if starts_with_http(link) {
        return Url::parse(link).map_err(resolution_error);
    }

    let base_url = Url::parse(base).map_err(resolution_error)?;
    base_url.join(link).map_err(resolution_error)
}

/// Filesystem-safe name for a page: every character that is not an ASCII
/// letter, digit, `-` or `.` becomes `_`, then `.html` is appended.
///
/// Distinct URLs can map to the same name (`a/b` and `a?b`); the later write wins.
pub fn file_name_for_url(url: &str) -> String {
    let mut name: String = url
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    name.push_str(".html");
    name
}

/// Path component of a URL, `/` for the root, the input itself if it won't parse.
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}
