//! Page analysis: URL in, resolved asset links out.

use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::asset::AssetLink;
use crate::render::{PageRenderer, RenderError};
use crate::resolver::{AcceptedExtensions, resolve};

/// Errors produced by [`analyze_page`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The page URL could not be parsed.
    #[error("invalid page URL '{url}': {source}\n  Suggestion: pass an absolute http(s) URL")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The page URL is absolute but not http(s).
    #[error("unsupported scheme '{scheme}' in page URL '{url}'")]
    UnsupportedScheme {
        /// The rejected input.
        url: String,
        /// Its scheme.
        scheme: String,
    },

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Parses `page_url` as an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`AnalyzeError::InvalidUrl`] or [`AnalyzeError::UnsupportedScheme`].
pub fn parse_page_url(page_url: &str) -> Result<Url, AnalyzeError> {
    let trimmed = page_url.trim();
    let url = Url::parse(trimmed).map_err(|source| AnalyzeError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AnalyzeError::UnsupportedScheme {
            url: trimmed.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    Ok(url)
}

/// Renders `page_url` and resolves its asset links in document order.
///
/// A page without matching anchors yields `Ok` with an empty vector.
///
/// # Errors
///
/// Returns an error when the URL is invalid or rendering fails.
#[instrument(skip(renderer, extensions), fields(renderer = renderer.name(), extensions = %extensions))]
pub async fn analyze_page(
    renderer: &dyn PageRenderer,
    page_url: &str,
    extensions: &AcceptedExtensions,
) -> Result<Vec<AssetLink>, AnalyzeError> {
    let url = parse_page_url(page_url)?;
    let html = renderer.render(&url).await?;
    let links = resolve(&html, &url, extensions);
    info!(count = links.len(), "page analyzed");
    Ok(links)
}
