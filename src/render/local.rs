//! Renderer that reads a page saved to disk instead of launching a browser.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use super::{PageRenderer, RenderError};

/// Serves markup from a page saved to disk; the URL is ignored.
#[derive(Debug, Clone)]
pub struct LocalFileRenderer {
    path: PathBuf,
}

impl LocalFileRenderer {
    /// Creates a renderer reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The saved page path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PageRenderer for LocalFileRenderer {
    fn name(&self) -> &'static str {
        "local-file"
    }

    #[instrument(skip(self), fields(renderer = "local-file", path = %self.path.display()))]
    async fn render(&self, url: &Url) -> Result<String, RenderError> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RenderError::io(&self.path, e))?;
        debug!(bytes = html.len(), "saved page loaded");
        Ok(html)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_renderer_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<a href=\"/x.mp4\">x</a>").unwrap();

        let renderer = LocalFileRenderer::new(&path);
        let url = Url::parse("https://site.example/post/1").unwrap();
        let html = renderer.render(&url).await.unwrap();
        assert!(html.contains("x.mp4"));
        assert_eq!(renderer.name(), "local-file");
    }

    #[tokio::test]
    async fn test_local_renderer_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = LocalFileRenderer::new(dir.path().join("missing.html"));
        let url = Url::parse("https://site.example/post/1").unwrap();
        let err = renderer.render(&url).await.unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
