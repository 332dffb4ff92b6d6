//! Launching the harvest browser.
//!
//! chromiumoxide finds an installed Chrome/Chromium on its own. When it
//! cannot, a managed Chromium is fetched into the user cache once and reused.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, trace};

use crate::utils::constants::CHROME_USER_AGENT;

/// Overrides executable detection when set
pub const CHROME_PATH_ENV: &str = "CHROMIUM_PATH";

/// Browser launch settings
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Profile directory; a per-process temp directory when `None`
    pub chrome_data_dir: Option<PathBuf>,
    /// Skip image decoding and media autoplay to cut page weight
    pub block_heavy_resources: bool,
}

impl LaunchOptions {
    /// Profile directory the browser will run with
    #[must_use]
    pub fn profile_dir(&self) -> PathBuf {
        self.chrome_data_dir.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("listscrape_chrome_{}", std::process::id()))
        })
    }

    /// Command-line flags on top of chromiumoxide's defaults
    #[must_use]
    pub fn extra_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--user-agent={CHROME_USER_AGENT}"),
            "--lang=en-US".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-notifications".to_string(),
            "--mute-audio".to_string(),
        ];
        if self.block_heavy_resources {
            args.push("--blink-settings=imagesEnabled=false".to_string());
            args.push("--autoplay-policy=user-gesture-required".to_string());
        }
        args
    }

    /// chromiumoxide config; `executable` pins the binary, otherwise it is detected
    fn browser_config(&self, executable: Option<PathBuf>) -> Result<BrowserConfig, String> {
        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .window_size(1920, 1080)
            .user_data_dir(self.profile_dir())
            .args(self.extra_args());

        builder = if self.headless {
            builder.headless_mode(HeadlessMode::default())
        } else {
            builder.with_head()
        };
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        builder.build()
    }
}

/// Fetch Chromium into the user cache and return its executable.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("listscrape")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

    info!("Fetching managed Chromium into {}", cache_dir.display());
    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    Ok(revision.executable_path)
}

/// Launch Chrome/Chromium with `options`.
///
/// Returns the browser, its event-handler task (which MUST be aborted when the
/// browser goes away) and the profile directory in use.
pub async fn launch_browser(options: &LaunchOptions) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let pinned = std::env::var_os(CHROME_PATH_ENV).map(PathBuf::from);

    let browser_config = match options.browser_config(pinned.clone()) {
        Ok(config) => config,
        Err(reason) if pinned.is_none() => {
            info!("No local browser detected ({reason})");
            let executable = download_managed_browser().await?;
            options
                .browser_config(Some(executable))
                .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?
        }
        Err(reason) => anyhow::bail!("Failed to build browser config: {reason}"),
    };

    let user_data_dir = options.profile_dir();
    std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // Chrome emits CDP events chromiumoxide cannot deserialize
                if message.contains("did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!("Ignored CDP event: {message}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        trace!("Browser handler finished");
    });

    Ok((browser, handler_task, user_data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavy_resources_are_blocked_by_flag() {
        let light = LaunchOptions {
            block_heavy_resources: true,
            ..LaunchOptions::default()
        };
        let args = light.extra_args();
        assert!(args.iter().any(|a| a == "--blink-settings=imagesEnabled=false"));

        let full = LaunchOptions::default().extra_args();
        assert!(!full.iter().any(|a| a.starts_with("--blink-settings")));
        assert!(full.iter().any(|a| a.starts_with("--user-agent=")));
    }

    #[test]
    fn explicit_profile_dir_wins() {
        let options = LaunchOptions {
            chrome_data_dir: Some(PathBuf::from("/var/lib/listscrape/profile")),
            ..LaunchOptions::default()
        };
        assert_eq!(options.profile_dir(), PathBuf::from("/var/lib/listscrape/profile"));
    }

    #[test]
    fn default_profile_dir_is_per_process() {
        let dir = LaunchOptions::default().profile_dir();
        assert!(dir.starts_with(std::env::temp_dir()));
        assert!(dir.to_string_lossy().ends_with(&std::process::id().to_string()));
    }
}
