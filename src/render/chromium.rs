//! Headless Chromium renderer.
//!
//! Each call launches a browser, loads the page, waits for scripts to settle
//! and returns the serialized DOM.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{PageRenderer, RenderError};

/// Time given to client-side scripts after navigation completes.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 5000;

/// Upper bound on navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;

/// Renders pages in a headless Chromium launched per call.
///
/// The browser is launched for each [`render`](PageRenderer::render) and
/// closed before it returns, whether or not rendering succeeded.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
    settle_delay: Duration,
    navigation_timeout: Duration,
    user_agent: Option<String>,
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromiumRenderer {
    /// Creates a renderer using chromiumoxide's browser discovery and default timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            executable: None,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
            user_agent: None,
        }
    }

    /// Uses the browser binary at `path` instead of discovering one.
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Sets the post-navigation settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the navigation timeout.
    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Overrides the browser's User-Agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Configured settle delay.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Configured navigation timeout.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(RenderError::browser_unavailable)
    }

    async fn render_in(&self, browser: &Browser, url: &Url) -> Result<String, RenderError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::navigation(url, e.to_string()))?;

        if let Some(user_agent) = &self.user_agent {
            page.set_user_agent(user_agent.as_str())
                .await
                .map_err(|e| RenderError::navigation(url, e.to_string()))?;
        }

        navigate(&page, url, self.navigation_timeout).await?;
        debug!(delay_ms = self.settle_delay.as_millis(), "waiting for scripts to settle");
        tokio::time::sleep(self.settle_delay).await;

        let html = page
            .content()
            .await
            .map_err(|e| RenderError::navigation(url, e.to_string()))?;

        if let Err(error) = page.close().await {
            debug!(%error, "page close failed");
        }
        Ok(html)
    }
}

async fn navigate(page: &Page, url: &Url, timeout: Duration) -> Result<(), RenderError> {
    match tokio::time::timeout(timeout, page.goto(url.as_str())).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(RenderError::navigation(url, e.to_string())),
        Err(_) => Err(RenderError::timeout(url, timeout.as_secs())),
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    fn name(&self) -> &'static str {
        "chromium"
    }

    #[instrument(skip(self), fields(renderer = "chromium", url = %url))]
    async fn render(&self, url: &Url) -> Result<String, RenderError> {
        let config = self.browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::browser_unavailable(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("rendering page");
        let result = self.render_in(&browser, url).await;

        if let Err(error) = browser.close().await {
            warn!(%error, "browser close failed");
        }
        if let Err(error) = browser.wait().await {
            debug!(%error, "browser process wait failed");
        }
        handler_task.abort();

        let html = result?;
        debug!(bytes = html.len(), "page rendered");
        Ok(html)
    }
}
