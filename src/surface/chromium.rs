//! Chromium binding of the rendering surface (chromiumoxide).

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use super::{Locator, RenderPage, RenderSession};
use crate::browser_setup::{LaunchOptions, launch_browser};
use crate::crawl_engine::crawl_types::{CrawlError, CrawlResult, NavigationError};
use crate::crawl_engine::page_timeout::with_navigation_timeout;

/// Attribute used to tag text-matched elements so CSS can fetch them
const MATCH_ATTR: &str = "data-listscrape-match";

/// Polling interval for `wait_for`
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A launched browser plus its tracked CDP handler task.
///
/// The handler MUST be aborted when the browser goes away, otherwise it runs
/// forever; `Drop` takes care of that if `shutdown` was never called.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl ChromiumSession {
    /// Find or download Chrome and launch it.
    pub async fn launch(options: &LaunchOptions) -> CrawlResult<Self> {
        let (browser, handler, user_data_dir) = launch_browser(options)
            .await
            .map_err(|e| CrawlError::Browser(format!("{e:#}")))?;

        Ok(Self {
            browser,
            handler,
            user_data_dir: options.chrome_data_dir.is_none().then_some(user_data_dir),
        })
    }

    /// Close the browser, wait for the process and remove the temp profile.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser process: {e}");
        }
        self.handler.abort();
        self.cleanup_temp_dir();
    }

    /// Remove the per-process profile directory.
    ///
    /// Must run after the browser exited so Chrome has released its file
    /// handles.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.user_data_dir.is_some() {
            warn!("ChromiumSession dropped without shutdown - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> CrawlResult<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to create page: {e}")))?;
        Ok(ChromiumPage { page })
    }
}

/// One Chromium tab
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// Tag every `tag` element whose text contains `text` (case-insensitive)
    /// and return how many were tagged.
    async fn tag_text_matches(&self, tag: &str, text: &str) -> usize {
        let script = format!(
            r"(() => {{
                const attr = {attr};
                document.querySelectorAll('[' + attr + ']').forEach(el => el.removeAttribute(attr));
                const needle = {needle}.toLowerCase();
                let count = 0;
                document.querySelectorAll({tag}).forEach(el => {{
                    const text = (el.innerText || el.textContent || '').toLowerCase();
                    if (text.includes(needle)) {{ el.setAttribute(attr, ''); count++; }}
                }});
                return count;
            }})()",
            attr = js_string(MATCH_ATTR),
            needle = js_string(text),
            tag = js_string(tag),
        );

        match self.page.evaluate(script).await {
            Ok(result) => result.into_value::<usize>().unwrap_or(0),
            Err(e) => {
                trace!("Text match script failed: {e}");
                0
            }
        }
    }
}

/// JSON string literal, safe to splice into a script
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl RenderPage for ChromiumPage {
    type Element = Element;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        let page = &self.page;
        with_navigation_timeout(
            async move {
                page.goto(url).await?;
                page.wait_for_navigation().await?;
                Ok::<_, chromiumoxide::error::CdpError>(())
            },
            timeout,
            url,
        )
        .await
    }

    async fn wait_for(&self, locator: Locator<'_>, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.query_one(locator).await.is_some() {
                trace!("{locator} appeared after {:?}", start.elapsed());
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn query_one(&self, locator: Locator<'_>) -> Option<Element> {
        match locator {
            Locator::Css(css) => self.page.find_element(css).await.ok(),
            Locator::TagWithText { tag, text } => {
                if self.tag_text_matches(tag, text).await == 0 {
                    return None;
                }
                let css = format!("{tag}[{MATCH_ATTR}]");
                self.page.find_element(css).await.ok()
            }
        }
    }

    async fn query_all(&self, locator: Locator<'_>) -> Vec<Element> {
        match locator {
            Locator::Css(css) => self.page.find_elements(css).await.unwrap_or_default(),
            Locator::TagWithText { tag, text } => {
                if self.tag_text_matches(tag, text).await == 0 {
                    return Vec::new();
                }
                let css = format!("{tag}[{MATCH_ATTR}]");
                self.page.find_elements(css).await.unwrap_or_default()
            }
        }
    }

    async fn text_of(&self, element: &Element) -> Option<String> {
        element.inner_text().await.ok().flatten()
    }

    async fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.attribute(name).await.ok().flatten()
    }

    async fn scroll_to_bottom(&self) {
        if let Err(e) = self
            .page
            .evaluate("window.scrollBy(0, document.body.scrollHeight)")
            .await
        {
            trace!("Scroll failed: {e}");
        }
    }

    async fn click(&self, element: &Element) -> bool {
        element.click().await.is_ok()
    }

    async fn close(self) {
        if let Err(e) = self.page.close().await {
            trace!("Failed to close page: {e}");
        }
    }
}
