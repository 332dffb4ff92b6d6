pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    absolutize, build_page_url, canonicalize_item_href, is_valid_url, origin_of, strip_query,
};

/// Normalize scraped text: non-breaking spaces become spaces, ends trimmed
#[inline]
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}
