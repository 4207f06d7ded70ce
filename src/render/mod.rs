//! Page rendering: turns a page URL into fully rendered markup.
//!
//! The [`PageRenderer`] trait is the seam between analysis and whatever
//! produces the HTML. [`ChromiumRenderer`] drives a headless browser so
//! script-inserted anchors are present; [`LocalFileRenderer`] reads a page
//! saved earlier, for offline analysis.

mod chromium;
mod local;

pub use chromium::{ChromiumRenderer, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_SETTLE_DELAY_MS};
pub use local::LocalFileRenderer;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors produced while rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The headless browser could not be started.
    #[error("browser unavailable: {message}\n  Suggestion: install Chromium or pass --chromium <PATH>")]
    BrowserUnavailable {
        /// Launch failure detail.
        message: String,
    },

    /// Navigation or markup extraction failed.
    #[error("failed to render {url}: {message}")]
    Navigation {
        /// Page being rendered.
        url: String,
        /// Failure detail.
        message: String,
    },

    /// Navigation did not finish in time.
    #[error("timed out rendering {url} after {seconds}s")]
    Timeout {
        /// Page being rendered.
        url: String,
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// A saved page could not be read.
    #[error("failed to read saved page {path}: {source}")]
    Io {
        /// Path of the saved page.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Creates a browser launch error.
    #[must_use]
    pub fn browser_unavailable(message: impl Into<String>) -> Self {
        Self::BrowserUnavailable {
            message: message.into(),
        }
    }

    /// Creates a navigation error.
    #[must_use]
    pub fn navigation(url: &Url, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(url: &Url, seconds: u64) -> Self {
        Self::Timeout {
            url: url.to_string(),
            seconds,
        }
    }

    /// Creates a saved-page read error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Produces the rendered markup of a page.
///
/// Uses `async_trait` so callers can hold a `Box<dyn PageRenderer>` chosen at
/// runtime.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the page's markup after client-side scripts have run.
    async fn render(&self, url: &Url) -> Result<String, RenderError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_messages() {
        let url = Url::parse("https://site.example/post/1").unwrap();
        assert_eq!(
            RenderError::timeout(&url, 60).to_string(),
            "timed out rendering https://site.example/post/1 after 60s"
        );
        assert!(
            RenderError::browser_unavailable("no binary")
                .to_string()
                .contains("--chromium")
        );
        assert!(
            RenderError::navigation(&url, "net::ERR_NAME_NOT_RESOLVED")
                .to_string()
                .contains("ERR_NAME_NOT_RESOLVED")
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = RenderError::io(
            "/nope.html",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nope.html"));
    }
}
