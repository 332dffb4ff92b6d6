//! Getter methods for `HarvestConfig`
//!
//! This module provides the accessor methods for retrieving configuration
//! values, plus a few values derived from them.

use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::types::HarvestConfig;
use crate::browser_setup::LaunchOptions;
use crate::crawl_engine::pacing::Pacer;
use crate::identity_store::IdentityPolicy;

impl HarvestConfig {
    #[must_use]
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full path of the run-scoped output file
    #[must_use]
    pub fn run_path(&self) -> PathBuf {
        self.output_dir.join(&self.run_file_name)
    }

    /// Full path of the cumulative master file
    #[must_use]
    pub fn master_path(&self) -> PathBuf {
        self.output_dir.join(&self.master_file_name)
    }

    /// Full path of the skip ledger
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.output_dir.join(&self.ledger_file_name)
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }

    #[must_use]
    pub fn variants(&self) -> &[u32] {
        &self.variants
    }

    #[must_use]
    pub fn quota(&self) -> usize {
        self.quota
    }

    #[must_use]
    pub fn offset_param(&self) -> &str {
        &self.offset_param
    }

    #[must_use]
    pub fn variant_param(&self) -> &str {
        &self.variant_param
    }

    #[must_use]
    pub fn item_path_pattern(&self) -> &str {
        &self.item_path_pattern
    }

    #[must_use]
    pub fn host_path_pattern(&self) -> &str {
        &self.host_path_pattern
    }

    /// Navigation timeout for search and detail pages
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    #[must_use]
    pub fn profile_timeout(&self) -> Duration {
        Duration::from_secs(self.profile_timeout_secs)
    }

    /// Bounded wait for the first item anchor on a search page
    #[must_use]
    pub fn anchor_wait(&self) -> Duration {
        Duration::from_secs(self.anchor_wait_secs)
    }

    /// Pacer applied before every navigation
    #[must_use]
    pub fn pacer(&self) -> Pacer {
        Pacer::from_millis(self.pacing_ms)
    }

    #[must_use]
    pub fn profile_scrolls(&self) -> u32 {
        self.profile_scrolls
    }

    /// Pacer applied between profile scrolls
    #[must_use]
    pub fn scroll_pacer(&self) -> Pacer {
        Pacer::from_millis(self.scroll_pacing_ms)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn block_heavy_resources(&self) -> bool {
        self.block_heavy_resources
    }

    #[must_use]
    pub fn scrape_profiles(&self) -> bool {
        self.scrape_profiles
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&Path> {
        self.chrome_data_dir.as_deref()
    }

    #[must_use]
    pub fn identity_policy(&self) -> IdentityPolicy {
        self.identity_policy
    }

    /// Browser launch settings derived from this config
    #[must_use]
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir.clone(),
            block_heavy_resources: self.block_heavy_resources,
        }
    }
}
