pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod identity_store;
pub mod page_extractor;
pub mod surface;
pub mod utils;

pub use browser_setup::{LaunchOptions, download_managed_browser, launch_browser};
pub use config::HarvestConfig;
pub use content_saver::{CsvRecordStore, MergeOutcome, RecordStore, StoreError, write_run_and_merge};
pub use crawl_engine::{
    ConfigError, CrawlError, CrawlResult, HarvestSummary, LogProgress, NavigationError,
    NoOpProgress, PageDescriptor, ProgressReporter, harvest, harvest_with,
};
pub use identity_store::{IdentityPolicy, IdentityStore};
pub use page_extractor::schema::*;
pub use surface::{ChromiumPage, ChromiumSession, Locator, RenderPage, RenderSession};
