//! Progress reporting abstraction for harvest runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting and
//! provides a no-op and a logging implementation.

use tracing::{info, warn};

use super::crawl_types::PageDescriptor;

/// Trait for reporting harvest progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update UI, etc.
pub trait ProgressReporter: Send + Sync {
    /// A search page was loaded; `new_identifiers` were new to the run
    fn report_page_visited(&self, page: PageDescriptor, new_identifiers: usize);

    /// A search page could not be loaded
    fn report_page_failed(&self, page: PageDescriptor, error: &str);

    /// Frontier collection finished with `collected` identifiers
    fn report_frontier_complete(&self, collected: usize);

    /// Item `index` of `total` produced a record
    fn report_item_extracted(&self, index: usize, total: usize, identifier: &str);

    /// Item `index` of `total` was skipped
    fn report_item_failed(&self, index: usize, total: usize, identifier: &str, error: &str);

    /// Results were persisted and the run is over
    fn report_completed(&self, extracted: usize, appended: usize);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_page_visited(&self, _page: PageDescriptor, _new_identifiers: usize) {}

    #[inline(always)]
    fn report_page_failed(&self, _page: PageDescriptor, _error: &str) {}

    #[inline(always)]
    fn report_frontier_complete(&self, _collected: usize) {}

    #[inline(always)]
    fn report_item_extracted(&self, _index: usize, _total: usize, _identifier: &str) {}

    #[inline(always)]
    fn report_item_failed(&self, _index: usize, _total: usize, _identifier: &str, _error: &str) {}

    #[inline(always)]
    fn report_completed(&self, _extracted: usize, _appended: usize) {}
}

/// One terse line per page and per item through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_page_visited(&self, page: PageDescriptor, new_identifiers: usize) {
        info!("[{page}] +{new_identifiers} new");
    }

    fn report_page_failed(&self, page: PageDescriptor, error: &str) {
        warn!("[{page}] skipped: {error}");
    }

    fn report_frontier_complete(&self, collected: usize) {
        info!("{collected} new items to extract");
    }

    fn report_item_extracted(&self, index: usize, total: usize, identifier: &str) {
        info!("[{index}/{total}] ok {identifier}");
    }

    fn report_item_failed(&self, index: usize, total: usize, identifier: &str, error: &str) {
        warn!("[{index}/{total}] skipped {identifier}: {error}");
    }

    fn report_completed(&self, extracted: usize, appended: usize) {
        info!("Done: {extracted} extracted, {appended} new in master");
    }
}
