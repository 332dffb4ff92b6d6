//! Type-safe builder for `HarvestConfig` using the typestate pattern
//!
//! The output directory and the search URL must both be set before
//! `build()` becomes available; everything else has a default. Values are
//! validated once in `build()` so the engine never re-checks them.

use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::HarvestConfig;
use crate::crawl_engine::crawl_types::ConfigError;
use crate::identity_store::IdentityPolicy;
use crate::utils::{
    DEFAULT_ANCHOR_WAIT_SECS, DEFAULT_HOST_PATH_PATTERN, DEFAULT_ITEM_PATH_PATTERN,
    DEFAULT_MAX_OFFSET, DEFAULT_OFFSET_PARAM, DEFAULT_PACING_MS, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_TIMEOUT_SECS, DEFAULT_PROFILE_SCROLLS, DEFAULT_PROFILE_TIMEOUT_SECS,
    DEFAULT_QUOTA, DEFAULT_SCROLL_PACING_MS, DEFAULT_VARIANT_PARAM, DEFAULT_VARIANTS,
    LEDGER_FILE_NAME, MASTER_FILE_NAME, RUN_FILE_NAME, origin_of,
};

// Type states for the builder
pub struct WithOutputDir;
pub struct WithSearchUrl;

pub struct HarvestConfigBuilder<State = ()> {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) search_url: Option<String>,
    pub(crate) origin: Option<String>,
    pub(crate) run_file_name: String,
    pub(crate) master_file_name: String,
    pub(crate) ledger_file_name: String,
    pub(crate) page_size: u32,
    pub(crate) max_offset: u32,
    pub(crate) variants: Vec<u32>,
    pub(crate) quota: usize,
    pub(crate) offset_param: String,
    pub(crate) variant_param: String,
    pub(crate) item_path_pattern: String,
    pub(crate) host_path_pattern: String,
    pub(crate) page_timeout_secs: u64,
    pub(crate) profile_timeout_secs: u64,
    pub(crate) anchor_wait_secs: u64,
    pub(crate) pacing_ms: (u64, u64),
    pub(crate) profile_scrolls: u32,
    pub(crate) scroll_pacing_ms: (u64, u64),
    pub(crate) headless: bool,
    pub(crate) block_heavy_resources: bool,
    pub(crate) scrape_profiles: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) identity_policy: IdentityPolicy,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for HarvestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            output_dir: None,
            search_url: None,
            origin: None,
            run_file_name: RUN_FILE_NAME.to_string(),
            master_file_name: MASTER_FILE_NAME.to_string(),
            ledger_file_name: LEDGER_FILE_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_offset: DEFAULT_MAX_OFFSET,
            variants: DEFAULT_VARIANTS.to_vec(),
            quota: DEFAULT_QUOTA,
            offset_param: DEFAULT_OFFSET_PARAM.to_string(),
            variant_param: DEFAULT_VARIANT_PARAM.to_string(),
            item_path_pattern: DEFAULT_ITEM_PATH_PATTERN.to_string(),
            host_path_pattern: DEFAULT_HOST_PATH_PATTERN.to_string(),
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            profile_timeout_secs: DEFAULT_PROFILE_TIMEOUT_SECS,
            anchor_wait_secs: DEFAULT_ANCHOR_WAIT_SECS,
            pacing_ms: DEFAULT_PACING_MS,
            profile_scrolls: DEFAULT_PROFILE_SCROLLS,
            scroll_pacing_ms: DEFAULT_SCROLL_PACING_MS,
            headless: true,
            block_heavy_resources: true,
            scrape_profiles: true,
            chrome_data_dir: None,
            identity_policy: IdentityPolicy::default(),
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder<()> {
        HarvestConfigBuilder::default()
    }
}

impl<State> HarvestConfigBuilder<State> {
    /// Move every field into a builder of another state
    fn transition<Next>(self) -> HarvestConfigBuilder<Next> {
        HarvestConfigBuilder {
            output_dir: self.output_dir,
            search_url: self.search_url,
            origin: self.origin,
            run_file_name: self.run_file_name,
            master_file_name: self.master_file_name,
            ledger_file_name: self.ledger_file_name,
            page_size: self.page_size,
            max_offset: self.max_offset,
            variants: self.variants,
            quota: self.quota,
            offset_param: self.offset_param,
            variant_param: self.variant_param,
            item_path_pattern: self.item_path_pattern,
            host_path_pattern: self.host_path_pattern,
            page_timeout_secs: self.page_timeout_secs,
            profile_timeout_secs: self.profile_timeout_secs,
            anchor_wait_secs: self.anchor_wait_secs,
            pacing_ms: self.pacing_ms,
            profile_scrolls: self.profile_scrolls,
            scroll_pacing_ms: self.scroll_pacing_ms,
            headless: self.headless,
            block_heavy_resources: self.block_heavy_resources,
            scrape_profiles: self.scrape_profiles,
            chrome_data_dir: self.chrome_data_dir,
            identity_policy: self.identity_policy,
            _phantom: PhantomData,
        }
    }
}

impl HarvestConfigBuilder<()> {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> HarvestConfigBuilder<WithOutputDir> {
        self.output_dir = Some(dir.into());
        self.transition()
    }
}

impl HarvestConfigBuilder<WithOutputDir> {
    pub fn search_url(mut self, url: impl Into<String>) -> HarvestConfigBuilder<WithSearchUrl> {
        let url_string = url.into().trim().to_string();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url = if url_string.is_empty() || url_string.contains("://") {
            url_string
        } else {
            format!("https://{url_string}")
        };

        self.search_url = Some(normalized_url);
        self.transition()
    }
}

// Build method only available when all required fields are set
impl HarvestConfigBuilder<WithSearchUrl> {
    pub fn build(self) -> Result<HarvestConfig, ConfigError> {
        let raw_url = self
            .search_url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingSearchUrl)?;

        let search_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidSearchUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(search_url.scheme(), "http" | "https") || search_url.host().is_none() {
            return Err(ConfigError::InvalidSearchUrl {
                url: raw_url,
                reason: "expected an http(s) URL with a host".to_string(),
            });
        }

        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page size must be positive".into()));
        }
        if self.variants.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one pagination variant is required".into(),
            ));
        }
        if self.quota == 0 {
            return Err(ConfigError::Invalid("quota must be positive".into()));
        }
        if self.offset_param.is_empty() || self.variant_param.is_empty() {
            return Err(ConfigError::Invalid(
                "pagination parameter names must not be empty".into(),
            ));
        }
        if self.offset_param == self.variant_param {
            return Err(ConfigError::Invalid(format!(
                "offset and variant parameters must differ (both '{}')",
                self.offset_param
            )));
        }
        if self.item_path_pattern.is_empty() || self.host_path_pattern.is_empty() {
            return Err(ConfigError::Invalid("path patterns must not be empty".into()));
        }
        for name in [
            &self.run_file_name,
            &self.master_file_name,
            &self.ledger_file_name,
        ] {
            if name.is_empty() {
                return Err(ConfigError::Invalid("file names must not be empty".into()));
            }
        }
        let files = [
            ("run", &self.run_file_name),
            ("master", &self.master_file_name),
            ("ledger", &self.ledger_file_name),
        ];
        for (i, (role, name)) in files.iter().enumerate() {
            if let Some((other, _)) = files[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(ConfigError::Invalid(format!(
                    "{role} and {other} files must be different files (both '{name}')"
                )));
            }
        }

        let origin = match self.origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => origin_of(&search_url),
        };

        Ok(HarvestConfig {
            search_url,
            origin,
            output_dir: self
                .output_dir
                .ok_or_else(|| ConfigError::Invalid("output directory is required".into()))?,
            run_file_name: self.run_file_name,
            master_file_name: self.master_file_name,
            ledger_file_name: self.ledger_file_name,
            page_size: self.page_size,
            max_offset: self.max_offset,
            variants: self.variants,
            quota: self.quota,
            offset_param: self.offset_param,
            variant_param: self.variant_param,
            item_path_pattern: self.item_path_pattern,
            host_path_pattern: self.host_path_pattern,
            page_timeout_secs: self.page_timeout_secs,
            profile_timeout_secs: self.profile_timeout_secs,
            anchor_wait_secs: self.anchor_wait_secs,
            pacing_ms: self.pacing_ms,
            profile_scrolls: self.profile_scrolls,
            scroll_pacing_ms: self.scroll_pacing_ms,
            headless: self.headless,
            block_heavy_resources: self.block_heavy_resources,
            scrape_profiles: self.scrape_profiles,
            chrome_data_dir: self.chrome_data_dir,
            identity_policy: self.identity_policy,
        })
    }
}

// Optional settings, available at any state
impl<State> HarvestConfigBuilder<State> {
    /// Override the origin used to absolutize relative links
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn run_file_name(mut self, name: impl Into<String>) -> Self {
        self.run_file_name = name.into();
        self
    }

    #[must_use]
    pub fn master_file_name(mut self, name: impl Into<String>) -> Self {
        self.master_file_name = name.into();
        self
    }

    #[must_use]
    pub fn ledger_file_name(mut self, name: impl Into<String>) -> Self {
        self.ledger_file_name = name.into();
        self
    }

    /// Offset step between pages; must match the surface's page size
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Inclusive offset ceiling
    #[must_use]
    pub fn max_offset(mut self, offset: u32) -> Self {
        self.max_offset = offset;
        self
    }

    #[must_use]
    pub fn variants(mut self, variants: impl Into<Vec<u32>>) -> Self {
        self.variants = variants.into();
        self
    }

    /// Maximum number of new items per run
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_tools_listscrape::config::HarvestConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = HarvestConfig::builder()
    ///     .output_dir("./output")
    ///     .search_url("https://listings.example.com/s/homes")
    ///     .quota(50)
    ///     .build()?;
    /// assert_eq!(config.quota(), 50);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    #[must_use]
    pub fn offset_param(mut self, name: impl Into<String>) -> Self {
        self.offset_param = name.into();
        self
    }

    #[must_use]
    pub fn variant_param(mut self, name: impl Into<String>) -> Self {
        self.variant_param = name.into();
        self
    }

    #[must_use]
    pub fn item_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.item_path_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn host_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.host_path_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn page_timeout_secs(mut self, secs: u64) -> Self {
        self.page_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn profile_timeout_secs(mut self, secs: u64) -> Self {
        self.profile_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn anchor_wait_secs(mut self, secs: u64) -> Self {
        self.anchor_wait_secs = secs;
        self
    }

    /// Delay range before each navigation, in milliseconds.
    /// `(0, 0)` disables pacing.
    #[must_use]
    pub fn pacing_ms(mut self, min: u64, max: u64) -> Self {
        self.pacing_ms = (min, max);
        self
    }

    #[must_use]
    pub fn profile_scrolls(mut self, scrolls: u32) -> Self {
        self.profile_scrolls = scrolls;
        self
    }

    #[must_use]
    pub fn scroll_pacing_ms(mut self, min: u64, max: u64) -> Self {
        self.scroll_pacing_ms = (min, max);
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn block_heavy_resources(mut self, block: bool) -> Self {
        self.block_heavy_resources = block;
        self
    }

    #[must_use]
    pub fn scrape_profiles(mut self, scrape: bool) -> Self {
        self.scrape_profiles = scrape;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.identity_policy = policy;
        self
    }
}
