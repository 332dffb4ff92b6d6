//! Host profile extraction
//!
//! A profile is fetched on its own page so the detail page stays intact.
//! The page is closed on every path out of [`scrape_host_profile`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::schema::{ExtractionMiss, FieldResult, HostProfile, settle};
use crate::config::HarvestConfig;
use crate::crawl_engine::crawl_types::{CrawlError, NavigationError};
use crate::crawl_engine::pacing::Pacer;
use crate::surface::{Locator, RenderPage, RenderSession, text_of_first};
use crate::utils::{clean_text, strip_query};

/// A 0.00-5.00 decimal followed by a rating marker
static RATING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([0-5]\.\d{1,2})\s*(?:out of 5|·|/5|rating|reviews)")
        .expect("Invalid rating regex")
});

/// First rating-looking decimal in `text` that does not exceed 5.0
#[must_use]
pub fn find_rating(text: &str) -> Option<String> {
    RATING_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|value| value.parse::<f32>().is_ok_and(|v| v <= 5.0))
        .map(str::to_string)
}

/// Profile fetch failure. The caller keeps the record with empty host fields.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("could not open profile page: {0}")]
    Page(#[from] CrawlError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Open a scoped page, load the profile, read the three host fields.
pub async fn scrape_host_profile<S: RenderSession>(
    session: &S,
    profile_url: &str,
    config: &HarvestConfig,
    pacer: &Pacer,
) -> Result<HostProfile, ProfileError> {
    let page = session.new_page().await?;

    pacer.pause().await;
    let result = match page.navigate(profile_url, config.profile_timeout()).await {
        Ok(()) => {
            force_lazy_load(&page, config.profile_scrolls(), &config.scroll_pacer()).await;
            Ok(read_profile(&page, config.item_path_pattern(), profile_url).await)
        }
        Err(e) => Err(ProfileError::from(e)),
    };

    page.close().await;
    result
}

/// Scroll to the bottom a fixed number of times.
///
/// The profile view lazy-loads its listing cards with no completion
/// signal, so this is a bounded best-effort heuristic.
pub async fn force_lazy_load<P: RenderPage>(page: &P, scrolls: u32, pacer: &Pacer) {
    for _ in 0..scrolls {
        page.scroll_to_bottom().await;
        pacer.pause().await;
    }
}

/// Read every profile field from an already loaded page
pub async fn read_profile<P: RenderPage>(
    page: &P,
    item_pattern: &str,
    profile_url: &str,
) -> HostProfile {
    HostProfile {
        rating: settle(extract_rating(page).await, profile_url),
        listing_count: count_listings(page, item_pattern).await,
        joined_date: settle(extract_joined(page).await, profile_url),
    }
}

async fn extract_rating<P: RenderPage>(page: &P) -> FieldResult {
    const FIELD: &str = "hostRating";
    let body = text_of_first(page, Locator::Css("body"))
        .await
        .ok_or(ExtractionMiss::EmptyText { field: FIELD })?;
    find_rating(&body).ok_or(ExtractionMiss::NoPatternMatch { field: FIELD })
}

/// Distinct item links on the profile, compared without query string.
///
/// A loaded profile without item links counts as `"0"`.
async fn count_listings<P: RenderPage>(page: &P, item_pattern: &str) -> String {
    let selector = format!("a[href*='{item_pattern}']");
    let anchors = page.query_all(Locator::Css(&selector)).await;

    let mut distinct = HashSet::new();
    for anchor in &anchors {
        if let Some(href) = page.attribute(anchor, "href").await {
            let href = strip_query(href.trim());
            if !href.is_empty() {
                distinct.insert(href.to_string());
            }
        }
    }

    distinct.len().to_string()
}

async fn extract_joined<P: RenderPage>(page: &P) -> FieldResult {
    const FIELD: &str = "hostJoinedDate";
    for tag in ["span", "div"] {
        let locator = Locator::TagWithText {
            tag,
            text: "Joined",
        };
        if let Some(text) = text_of_first(page, locator).await {
            let text = clean_text(&text);
            if !text.is_empty() {
                return Ok(text);
            }
        }
    }
    Err(ExtractionMiss::ElementNotFound {
        field: FIELD,
        locator: "span|div:has-text('Joined')".to_string(),
    })
}
