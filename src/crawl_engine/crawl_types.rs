//! Core types for harvesting operations.
//!
//! This module contains the error taxonomy used throughout the crawler and
//! the `PageDescriptor` produced by pagination.

use std::fmt;
use thiserror::Error;

use crate::content_saver::StoreError;

/// Top-level error for a harvest run
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Browser could not be found, downloaded or launched
    #[error("Browser error: {0}")]
    Browser(String),

    /// Navigation failure surfaced outside a per-item scope
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Record store could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Other errors
    #[error("Crawl error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Target unreachable or too slow. Fatal to one page or item only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("navigation to {url} failed: {message}")]
    Failed { url: String, message: String },
}

impl NavigationError {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. } | Self::Failed { url, .. } => url,
        }
    }
}

/// Startup configuration problems
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search URL is required")]
    MissingSearchUrl,

    #[error("search URL '{url}' is invalid: {reason}")]
    InvalidSearchUrl { url: String, reason: String },

    #[error("{0}")]
    Invalid(String),
}

/// One pagination request: an offset and a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageDescriptor {
    /// Multiple of the page size
    pub offset: u32,
    pub variant: u32,
}

impl fmt::Display for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset={} variant={}", self.offset, self.variant)
    }
}
