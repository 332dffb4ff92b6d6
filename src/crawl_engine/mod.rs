//! Crawl Engine Module
//!
//! This module contains the discovery and extraction engine: pagination,
//! frontier collection, pacing and timeouts, and the run orchestration that
//! ties them to the identity store and the record stores.

// Sub-modules
pub mod crawl_types;
pub mod execution;
pub mod frontier;
pub mod pacing;
pub mod page_timeout;
pub mod pagination;
pub mod progress;

// Re-exports for public API
pub use execution::{HarvestSummary, harvest, harvest_with};

// Re-export frontier and progress types for advanced usage
pub use frontier::{FrontierBatch, collect_frontier};
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};

pub use pacing::Pacer;
pub use pagination::PageEnumerator;

// Re-export crawl types
pub use crawl_types::{ConfigError, CrawlError, CrawlResult, NavigationError, PageDescriptor};
