//! URL manipulation utilities.
//!
//! This module provides functions for building paginated search URLs and
//! turning raw `href` values into canonical identifiers.

use url::Url;

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
        }
        Err(_) => false,
    }
}

/// Origin of a URL as `scheme://host[:port]`, without trailing slash
#[must_use]
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Overwrite (or append) the pagination parameters on a search URL.
///
/// Existing parameters keep their position and every other parameter is
/// left untouched, so the filters baked into the base URL survive.
#[must_use]
pub fn build_page_url(
    base: &Url,
    offset_param: &str,
    offset: u32,
    variant_param: &str,
    variant: u32,
) -> Url {
    let offset_value = offset.to_string();
    let variant_value = variant.to_string();

    let mut pairs: Vec<(String, String)> = base
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (name, value) in [(offset_param, &offset_value), (variant_param, &variant_value)] {
        match pairs.iter_mut().find(|(k, _)| k == name) {
            Some(pair) => pair.1.clone_from(value),
            None => pairs.push((name.to_string(), value.clone())),
        }
    }

    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}

/// Resolve an `href` against the canonical origin.
///
/// Root-relative paths get the origin prepended, protocol-relative paths get
/// `https:`; anything else is returned trimmed but otherwise as found.
#[must_use]
pub fn absolutize(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("{}{href}", origin.trim_end_matches('/'))
    } else {
        href.to_string()
    }
}

/// Drop everything from the first `?` or `#` onwards
#[inline]
#[must_use]
pub fn strip_query(href: &str) -> &str {
    match href.find(['?', '#']) {
        Some(idx) => &href[..idx],
        None => href,
    }
}

/// Canonical identifier for an item link, or `None` if the link is not one.
///
/// Canonical form is the absolute URL with query string and fragment
/// removed. Links that are not http(s) or whose canonical form does not
/// contain `item_pattern` are rejected.
#[must_use]
pub fn canonicalize_item_href(href: &str, origin: &str, item_pattern: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = absolutize(href, origin);
    let canonical = strip_query(&absolute);

    if is_valid_url(canonical) && canonical.contains(item_pattern) {
        Some(canonical.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_overwrites_existing_params_in_place() {
        let base = Url::parse("https://example.com/s/homes?query=x&items_offset=99&channel=EXPLORE")
            .expect("valid url");

        let url = build_page_url(&base, "items_offset", 40, "section_offset", 3);

        assert_eq!(
            url.as_str(),
            "https://example.com/s/homes?query=x&items_offset=40&channel=EXPLORE&section_offset=3"
        );
    }

    #[test]
    fn page_url_preserves_encoded_values() {
        let base = Url::parse("https://example.com/s?query=Duba%C3%AF%20centre").expect("valid url");

        let url = build_page_url(&base, "o", 0, "v", 0);
        let pairs: Vec<_> = url.query_pairs().collect();

        assert_eq!(pairs[0].1, "Dubaï centre");
        assert_eq!(pairs[1], ("o".into(), "0".into()));
        assert_eq!(pairs[2], ("v".into(), "0".into()));
    }

    #[test]
    fn canonicalize_relative_and_absolute() {
        let origin = "https://www.example.com";
        assert_eq!(
            canonicalize_item_href("/rooms/123?adults=2", origin, "/rooms/"),
            Some("https://www.example.com/rooms/123".to_string())
        );
        assert_eq!(
            canonicalize_item_href("https://other.example.com/rooms/9#photos", origin, "/rooms/"),
            Some("https://other.example.com/rooms/9".to_string())
        );
        assert_eq!(canonicalize_item_href("/experiences/5", origin, "/rooms/"), None);
        assert_eq!(canonicalize_item_href("   ", origin, "/rooms/"), None);
        assert_eq!(canonicalize_item_href("javascript:open('/rooms/1')", origin, "/rooms/"), None);
    }

    #[test]
    fn absolutize_protocol_relative() {
        assert_eq!(
            absolutize("//cdn.example.com/users/show/1", "https://www.example.com"),
            "https://cdn.example.com/users/show/1"
        );
    }
}
