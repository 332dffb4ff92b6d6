//! Item extraction.
//!
//! Turns one identifier into an `ItemRecord`: load the detail page, read
//! the title, license and host link independently, then optionally visit
//! the host profile. Only the detail navigation can fail the item; every
//! field-level miss degrades to an empty field.

// Sub-modules
pub mod extractors;
pub mod license;
pub mod profile;
pub mod schema;

use tracing::{debug, warn};

use crate::config::HarvestConfig;
use crate::crawl_engine::crawl_types::NavigationError;
use crate::crawl_engine::pacing::Pacer;
use crate::surface::{RenderPage, RenderSession};

// Re-exports for public API
pub use extractors::{dismiss_consent, extract_host_link, extract_title};
pub use license::{LICENSE_RULES, LicenseRule, LicenseScope, classify_license, match_license_text};
pub use profile::{find_rating, read_profile, scrape_host_profile};
pub use schema::{ExtractionMiss, HostLink, HostProfile, Identifier, ItemRecord};

use schema::settle;

/// Extract one item on `page`, opening a second page for the host profile.
///
/// # Errors
/// Returns the `NavigationError` when the detail page cannot be loaded. The
/// item is then skipped by the caller; nothing else is fatal here.
pub async fn extract_item<S: RenderSession>(
    session: &S,
    page: &S::Page,
    identifier: &Identifier,
    config: &HarvestConfig,
    pacer: &Pacer,
) -> Result<ItemRecord, NavigationError> {
    let url = identifier.as_str();

    pacer.pause().await;
    page.navigate(url, config.page_timeout()).await?;

    if dismiss_consent(page).await {
        debug!(%identifier, "Dismissed consent banner");
    }

    let mut record = read_detail_fields(page, identifier, config).await;

    if config.scrape_profiles() && !record.host_profile_ref.is_empty() {
        match scrape_host_profile(session, &record.host_profile_ref, config, pacer).await {
            Ok(profile) => record.apply_profile(profile),
            Err(e) => warn!(%identifier, "Host profile skipped: {e}"),
        }
    }

    Ok(record)
}

/// Every detail-page field of an already loaded page, host profile excluded
pub async fn read_detail_fields<P: RenderPage>(
    page: &P,
    identifier: &Identifier,
    config: &HarvestConfig,
) -> ItemRecord {
    let url = identifier.as_str();
    let mut record = ItemRecord::new(identifier.clone());
    record.title = settle(extract_title(page).await, url);
    record.license_code = settle(classify_license(page).await, url);
    let host = settle(
        extract_host_link(page, config.host_path_pattern(), config.origin()).await,
        url,
    );
    record.host_name = host.name;
    record.host_profile_ref = host.profile_ref;
    record
}
