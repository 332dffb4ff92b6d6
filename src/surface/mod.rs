//! Rendering surface abstraction.
//!
//! The crawl engine never talks to a browser directly. It drives a
//! `RenderSession` (one browser, able to open pages) and `RenderPage`s
//! (one tab each). Every query is infallible at this boundary: an element
//! that cannot be found or read is simply absent. Only navigation reports
//! failure.

pub mod chromium;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

pub use chromium::{ChromiumPage, ChromiumSession};

use crate::crawl_engine::crawl_types::{CrawlResult, NavigationError};

/// How to find elements on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator<'a> {
    /// Plain CSS selector
    Css(&'a str),
    /// Elements with the given tag name whose visible text contains `text`,
    /// in document order
    TagWithText { tag: &'a str, text: &'a str },
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::TagWithText { tag, text } => write!(f, "{tag}:has-text('{text}')"),
        }
    }
}

/// A browser able to hand out pages.
#[async_trait]
pub trait RenderSession: Send + Sync {
    type Page: RenderPage;

    /// Open a fresh blank page.
    async fn new_page(&self) -> CrawlResult<Self::Page>;
}

/// One browser tab.
#[async_trait]
pub trait RenderPage: Send + Sync {
    type Element: Send + Sync;

    /// Navigate and wait for the load to settle, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), NavigationError>;

    /// Poll until at least one element matches, or give up after `timeout`.
    async fn wait_for(&self, locator: Locator<'_>, timeout: Duration) -> bool;

    async fn query_one(&self, locator: Locator<'_>) -> Option<Self::Element>;

    async fn query_all(&self, locator: Locator<'_>) -> Vec<Self::Element>;

    /// Rendered text of the element, `None` when it cannot be read
    async fn text_of(&self, element: &Self::Element) -> Option<String>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    async fn scroll_to_bottom(&self);

    /// Click the element; returns whether the click was delivered
    async fn click(&self, element: &Self::Element) -> bool;

    /// Release the page. Called on every exit path of a scoped page.
    async fn close(self)
    where
        Self: Sized;
}

/// Convenience: text of the first element matching `locator`.
pub async fn text_of_first<P: RenderPage>(page: &P, locator: Locator<'_>) -> Option<String> {
    let element = page.query_one(locator).await?;
    page.text_of(&element).await
}
