//! Test utilities for the listscrape test suite
//!
//! `FakeSession` is a scripted rendering surface: every URL maps to a
//! `FakeDom`, a lookup table from CSS selector (or tag name, for text
//! matching) to the elements it should return.

#![allow(dead_code)]

use async_trait::async_trait;
use kodegen_tools_listscrape::config::HarvestConfig;
use kodegen_tools_listscrape::{
    CrawlResult, ItemRecord, Locator, NavigationError, RenderPage, RenderSession,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SEARCH_URL: &str = "https://listings.test/s/homes?query=dubai";
pub const ORIGIN: &str = "https://listings.test";

/// URL the harvester requests for one page descriptor
pub fn search_page(offset: u32, variant: u32) -> String {
    format!("{SEARCH_URL}&items_offset={offset}&section_offset={variant}")
}

pub fn item_url(id: &str) -> String {
    format!("{ORIGIN}/rooms/{id}")
}

pub fn profile_url(id: &str) -> String {
    format!("{ORIGIN}/users/show/{id}")
}

/// Config with pacing disabled and a small pagination window
pub fn test_config(output_dir: &Path, quota: usize) -> HarvestConfig {
    HarvestConfig::builder()
        .output_dir(output_dir)
        .search_url(SEARCH_URL)
        .quota(quota)
        .page_size(20)
        .max_offset(40)
        .variants(vec![0, 1])
        .pacing_ms(0, 0)
        .scroll_pacing_ms(0, 0)
        .profile_scrolls(2)
        .anchor_wait_secs(1)
        .build()
        .expect("valid test config")
}

pub fn record(id: &str, title: &str) -> ItemRecord {
    let mut record = ItemRecord::new(
        kodegen_tools_listscrape::Identifier::new(item_url(id)).expect("non-empty"),
    );
    record.title = title.to_string();
    record
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: Option<String>,
    pub attrs: HashMap<String, String>,
}

impl FakeElement {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            attrs: HashMap::new(),
        }
    }

    pub fn link(href: &str, text: &str) -> Self {
        Self::text(text).attr("href", href)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }
}

/// Elements of one page, keyed by selector or tag name
#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    by_key: HashMap<String, Vec<FakeElement>>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements answered for a CSS selector (or, by tag name, for text matching)
    pub fn with(mut self, key: &str, element: FakeElement) -> Self {
        self.by_key.entry(key.to_string()).or_default().push(element);
        self
    }

    pub fn body(self, text: &str) -> Self {
        self.with("body", FakeElement::text(text))
    }

    /// A search result page holding links to the given item ids
    pub fn search_results(ids: &[&str]) -> Self {
        ids.iter().fold(Self::new(), |dom, id| {
            dom.with(
                "a[href*='/rooms/']",
                FakeElement::link(&format!("/rooms/{id}?check_in=2025-01-01"), ""),
            )
        })
    }

    fn lookup(&self, locator: Locator<'_>) -> Vec<FakeElement> {
        match locator {
            Locator::Css(css) => self.by_key.get(css).cloned().unwrap_or_default(),
            Locator::TagWithText { tag, text } => {
                let needle = text.to_lowercase();
                self.by_key
                    .get(tag)
                    .map(|elements| {
                        elements
                            .iter()
                            .filter(|el| {
                                el.text
                                    .as_deref()
                                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                            })
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionLog {
    pub navigations: Vec<String>,
    pub pages_opened: usize,
    pub pages_closed: usize,
    pub clicks: Vec<String>,
}

#[derive(Default)]
struct Shared {
    pages: HashMap<String, FakeDom>,
    failing: HashSet<String>,
    log: Mutex<SessionLog>,
}

/// Scripted `RenderSession`
#[derive(Clone, Default)]
pub struct FakeSession {
    shared: Arc<Shared>,
}

impl FakeSession {
    pub fn builder() -> FakeSessionBuilder {
        FakeSessionBuilder::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.shared.log.lock().expect("log lock").navigations.clone()
    }

    pub fn navigations_matching(&self, needle: &str) -> usize {
        self.navigations()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }

    pub fn pages_opened(&self) -> usize {
        self.shared.log.lock().expect("log lock").pages_opened
    }

    pub fn pages_closed(&self) -> usize {
        self.shared.log.lock().expect("log lock").pages_closed
    }

    pub fn clicks(&self) -> Vec<String> {
        self.shared.log.lock().expect("log lock").clicks.clone()
    }
}

#[derive(Default)]
pub struct FakeSessionBuilder {
    pages: HashMap<String, FakeDom>,
    failing: HashSet<String>,
}

impl FakeSessionBuilder {
    pub fn page(mut self, url: impl Into<String>, dom: FakeDom) -> Self {
        self.pages.insert(url.into(), dom);
        self
    }

    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn build(self) -> FakeSession {
        FakeSession {
            shared: Arc::new(Shared {
                pages: self.pages,
                failing: self.failing,
                log: Mutex::new(SessionLog::default()),
            }),
        }
    }
}

#[async_trait]
impl RenderSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> CrawlResult<FakePage> {
        self.shared.log.lock().expect("log lock").pages_opened += 1;
        Ok(FakePage {
            shared: Arc::clone(&self.shared),
            dom: Mutex::new(FakeDom::default()),
        })
    }
}

/// One scripted tab. Unknown URLs load as empty pages.
pub struct FakePage {
    shared: Arc<Shared>,
    dom: Mutex<FakeDom>,
}

impl FakePage {
    fn current(&self) -> FakeDom {
        self.dom.lock().expect("dom lock").clone()
    }
}

#[async_trait]
impl RenderPage for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), NavigationError> {
        self.shared
            .log
            .lock()
            .expect("log lock")
            .navigations
            .push(url.to_string());

        if self.shared.failing.contains(url) {
            *self.dom.lock().expect("dom lock") = FakeDom::default();
            return Err(NavigationError::Failed {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }

        *self.dom.lock().expect("dom lock") =
            self.shared.pages.get(url).cloned().unwrap_or_default();
        Ok(())
    }

    async fn wait_for(&self, locator: Locator<'_>, _timeout: Duration) -> bool {
        !self.current().lookup(locator).is_empty()
    }

    async fn query_one(&self, locator: Locator<'_>) -> Option<FakeElement> {
        self.current().lookup(locator).into_iter().next()
    }

    async fn query_all(&self, locator: Locator<'_>) -> Vec<FakeElement> {
        self.current().lookup(locator)
    }

    async fn text_of(&self, element: &FakeElement) -> Option<String> {
        element.text.clone()
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Option<String> {
        element.attrs.get(name).cloned()
    }

    async fn scroll_to_bottom(&self) {}

    async fn click(&self, element: &FakeElement) -> bool {
        self.shared
            .log
            .lock()
            .expect("log lock")
            .clicks
            .push(element.text.clone().unwrap_or_default());
        true
    }

    async fn close(self) {
        self.shared.log.lock().expect("log lock").pages_closed += 1;
    }
}
