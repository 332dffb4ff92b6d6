//! Core configuration types for harvesting
//!
//! This module contains the `HarvestConfig` struct that defines every knob
//! of a harvest run. Construct it through [`HarvestConfig::builder`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::identity_store::IdentityPolicy;

/// Main configuration struct for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Base search URL. Offset and variant query parameters are written onto
    /// a copy of it for every page.
    pub(crate) search_url: Url,

    /// Scheme and host used to absolutize relative hrefs.
    ///
    /// Defaults to the origin of `search_url`.
    pub(crate) origin: String,

    /// Directory receiving the run file, master file and skip ledger
    pub(crate) output_dir: PathBuf,
    pub(crate) run_file_name: String,
    pub(crate) master_file_name: String,
    pub(crate) ledger_file_name: String,

    pub(crate) page_size: u32,
    /// Inclusive offset ceiling
    pub(crate) max_offset: u32,
    pub(crate) variants: Vec<u32>,
    pub(crate) quota: usize,
    pub(crate) offset_param: String,
    pub(crate) variant_param: String,

    /// Substring an href must contain to count as an item link
    pub(crate) item_path_pattern: String,
    /// Substring an href must contain to count as a host profile link
    pub(crate) host_path_pattern: String,

    pub(crate) page_timeout_secs: u64,
    pub(crate) profile_timeout_secs: u64,
    pub(crate) anchor_wait_secs: u64,

    /// `(min, max)` delay before every navigation, in milliseconds
    pub(crate) pacing_ms: (u64, u64),
    pub(crate) profile_scrolls: u32,
    pub(crate) scroll_pacing_ms: (u64, u64),

    pub(crate) headless: bool,
    /// Skip image loading and media autoplay in the browser
    pub(crate) block_heavy_resources: bool,
    /// Visit host profile pages to fill the host fields
    pub(crate) scrape_profiles: bool,
    /// Persistent browser profile directory, a temp one otherwise
    pub(crate) chrome_data_dir: Option<PathBuf>,

    pub(crate) identity_policy: IdentityPolicy,
}
