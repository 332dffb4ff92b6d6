//! Frontier collection
//!
//! Walks the paginated search surface and gathers identifiers the identity
//! store has never seen, up to the run quota. Each identifier enters the
//! store the moment it is collected so a later page cannot hand it out again.

use std::collections::HashSet;
use tracing::{debug, info};

use super::pacing::Pacer;
use super::pagination::PageEnumerator;
use super::progress::ProgressReporter;
use crate::config::HarvestConfig;
use crate::identity_store::IdentityStore;
use crate::page_extractor::schema::Identifier;
use crate::surface::{Locator, RenderPage};
use crate::utils::{build_page_url, canonicalize_item_href};

/// Result of one frontier pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierBatch {
    /// New identifiers in discovery order, at most `quota` of them
    pub identifiers: Vec<Identifier>,
    /// Search pages that loaded (with or without anchors)
    pub pages_visited: usize,
    /// Search pages whose navigation failed
    pub pages_failed: usize,
}

/// Collect up to `config.quota()` new identifiers.
///
/// Navigation failures and pages without anchors are logged and treated as
/// empty pages; they never abort the pass.
pub async fn collect_frontier<P, R>(
    page: &P,
    identity: &mut IdentityStore,
    config: &HarvestConfig,
    pacer: &Pacer,
    progress: &R,
) -> FrontierBatch
where
    P: RenderPage,
    R: ProgressReporter + ?Sized,
{
    let quota = config.quota();
    let anchor_selector = format!("a[href*='{}']", config.item_path_pattern());
    let mut enumerator = PageEnumerator::new(
        config.page_size(),
        config.max_offset(),
        config.variants().to_vec(),
    );
    let mut batch = FrontierBatch::default();

    while batch.identifiers.len() < quota {
        let Some(descriptor) = enumerator.next() else {
            info!("Offset ceiling {} reached", config.max_offset());
            break;
        };

        let url = build_page_url(
            config.search_url(),
            config.offset_param(),
            descriptor.offset,
            config.variant_param(),
            descriptor.variant,
        );

        pacer.pause().await;
        if let Err(e) = page.navigate(url.as_str(), config.page_timeout()).await {
            batch.pages_failed += 1;
            progress.report_page_failed(descriptor, &e.to_string());
            continue;
        }
        batch.pages_visited += 1;

        let candidates = if page
            .wait_for(Locator::Css(&anchor_selector), config.anchor_wait())
            .await
        {
            read_candidates(page, &anchor_selector, config).await
        } else {
            debug!("[{descriptor}] no item anchor within {:?}", config.anchor_wait());
            Vec::new()
        };

        let remaining = quota - batch.identifiers.len();
        let fresh = admit_new(candidates, identity, remaining);
        progress.report_page_visited(descriptor, fresh.len());

        if !fresh.is_empty() {
            batch.identifiers.extend(fresh);
            enumerator.skip_rest_of_offset();
        }
    }

    progress.report_frontier_complete(batch.identifiers.len());
    batch
}

/// Canonical item identifiers on the current page, deduplicated in page order
async fn read_candidates<P: RenderPage>(
    page: &P,
    anchor_selector: &str,
    config: &HarvestConfig,
) -> Vec<String> {
    let mut hrefs = Vec::new();
    for anchor in page.query_all(Locator::Css(anchor_selector)).await {
        if let Some(href) = page.attribute(&anchor, "href").await {
            hrefs.push(href);
        }
    }
    canonical_candidates(hrefs, config.origin(), config.item_path_pattern())
}

/// Canonicalize raw hrefs and drop repeats, keeping first occurrences
#[must_use]
pub fn canonical_candidates<I, S>(hrefs: I, origin: &str, item_pattern: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    hrefs
        .into_iter()
        .filter_map(|href| canonicalize_item_href(href.as_ref(), origin, item_pattern))
        .filter(|canonical| seen.insert(canonical.clone()))
        .collect()
}

/// Move up to `limit` unseen candidates into the identity store.
///
/// Candidates past the limit are left untouched so a later run still finds
/// them.
pub fn admit_new(
    candidates: Vec<String>,
    identity: &mut IdentityStore,
    limit: usize,
) -> Vec<Identifier> {
    let mut admitted = Vec::new();
    for candidate in candidates {
        if admitted.len() >= limit {
            break;
        }
        let Some(identifier) = Identifier::new(candidate) else {
            continue;
        };
        if identity.insert(identifier.as_str()) {
            admitted.push(identifier);
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity_store::IdentityPolicy;

    const ORIGIN: &str = "https://www.example.com";

    #[test]
    fn candidates_keep_page_order_without_repeats() {
        let hrefs = [
            "/rooms/2?check_in=x",
            "/rooms/1",
            "https://www.example.com/rooms/2#photos",
            "/help",
        ];
        assert_eq!(
            canonical_candidates(hrefs, ORIGIN, "/rooms/"),
            vec![
                "https://www.example.com/rooms/2".to_string(),
                "https://www.example.com/rooms/1".to_string(),
            ]
        );
    }

    #[test]
    fn admit_skips_known_and_respects_limit() {
        let mut identity = IdentityStore::new(IdentityPolicy::MarkOnDiscovery);
        identity.insert("a");

        let admitted = admit_new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            &mut identity,
            2,
        );

        let ids: Vec<&str> = admitted.iter().map(Identifier::as_str).collect();
        assert_eq!(ids, ["b", "c"]);
        assert!(!identity.contains("d"), "over-quota candidate must stay unseen");
    }
}
