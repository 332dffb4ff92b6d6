//! Detail page field extractors
//!
//! Each extractor reads one field from an already loaded detail page and
//! reports a miss instead of failing.

use super::schema::{ExtractionMiss, FieldResult, HostLink};
use crate::surface::{Locator, RenderPage};
use crate::utils::{absolutize, clean_text};

/// Dismiss a consent banner if one is showing. Best effort.
///
/// Returns whether a button was clicked.
pub async fn dismiss_consent<P: RenderPage>(page: &P) -> bool {
    let accept = page
        .query_one(Locator::TagWithText {
            tag: "button",
            text: "Accept",
        })
        .await;
    if let Some(button) = accept {
        return page.click(&button).await;
    }

    // "OK" as a substring would also hit "Book", "Look" ...
    for button in page
        .query_all(Locator::TagWithText {
            tag: "button",
            text: "OK",
        })
        .await
    {
        let label = page.text_of(&button).await.unwrap_or_default();
        if clean_text(&label).eq_ignore_ascii_case("ok") {
            return page.click(&button).await;
        }
    }
    false
}

/// First `h1` of the page
pub async fn extract_title<P: RenderPage>(page: &P) -> FieldResult {
    const FIELD: &str = "title";
    let heading = page
        .query_one(Locator::Css("h1"))
        .await
        .ok_or_else(|| ExtractionMiss::ElementNotFound {
            field: FIELD,
            locator: "h1".to_string(),
        })?;
    non_empty(FIELD, page.text_of(&heading).await)
}

/// First link to a host profile: its text and absolute target
pub async fn extract_host_link<P: RenderPage>(
    page: &P,
    host_pattern: &str,
    origin: &str,
) -> FieldResult<HostLink> {
    const FIELD: &str = "hostProfileRef";
    let selector = format!("a[href*='{host_pattern}']");
    let anchor = page
        .query_one(Locator::Css(&selector))
        .await
        .ok_or_else(|| ExtractionMiss::ElementNotFound {
            field: FIELD,
            locator: selector.clone(),
        })?;

    let href = page.attribute(&anchor, "href").await.unwrap_or_default();
    let href = href.trim();
    if href.is_empty() {
        return Err(ExtractionMiss::EmptyText { field: FIELD });
    }

    // An avatar-only link has no text; the profile is still worth visiting
    let name = page
        .text_of(&anchor)
        .await
        .map(|text| clean_text(&text))
        .unwrap_or_default();

    Ok(HostLink {
        name,
        profile_ref: absolutize(href, origin),
    })
}

fn non_empty(field: &'static str, text: Option<String>) -> FieldResult {
    let text = clean_text(&text.unwrap_or_default());
    if text.is_empty() {
        Err(ExtractionMiss::EmptyText { field })
    } else {
        Ok(text)
    }
}
