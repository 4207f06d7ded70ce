//! Link resolution: rendered markup in, ordered asset links out.
//!
//! [`resolve`] is a pure function of its inputs. It walks every anchor of the
//! document in order, keeps those whose href path ends with an accepted
//! extension, joins them against the page URL and names each one
//! `"{published date} {filename}"`.
//!
//! # Example
//!
//! ```
//! use assetgrab_core::resolver::{AcceptedExtensions, resolve};
//! use url::Url;
//!
//! let html = r#"<div class="post__published">2024-03-07</div>
//!     <a href="/data/ab/clip.mp4?f=Intro.mp4">Download</a>"#;
//! let base = Url::parse("https://site.example/user/1/post/2").unwrap();
//! let links = resolve(html, &base, &AcceptedExtensions::default());
//! assert_eq!(links[0].source_url.as_str(), "https://site.example/data/ab/clip.mp4?f=Intro.mp4");
//! assert_eq!(links[0].display_name, "24.3.7 Intro.mp4");
//! ```

mod date;
mod extensions;
mod filename;

pub use date::{PublishedDate, UNKNOWN_DATE};
pub use extensions::{AcceptedExtensions, DEFAULT_EXTENSIONS, ExtensionError};
pub use filename::{NameSource, query_param_f, resolve_filename, url_basename};

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, instrument, trace};
use url::Url;

use crate::asset::AssetLink;

#[allow(clippy::expect_used)]
static ANCHOR_WITH_HREF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Rendered markup together with the URL it was rendered from.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Fully rendered HTML.
    pub html: String,
    /// URL relative hrefs are joined against.
    pub base_url: Url,
}

impl RenderedDocument {
    /// Creates a new document.
    #[must_use]
    pub fn new(html: impl Into<String>, base_url: Url) -> Self {
        Self {
            html: html.into(),
            base_url,
        }
    }

    /// Resolves the document's asset links.
    #[must_use]
    pub fn resolve(&self, extensions: &AcceptedExtensions) -> Vec<AssetLink> {
        resolve(&self.html, &self.base_url, extensions)
    }
}

/// Extracts asset links from `html` in document order.
///
/// A document without matching anchors yields an empty vector.
#[must_use]
#[instrument(skip(html, extensions), fields(html_len = html.len(), base_url = %base_url))]
pub fn resolve(html: &str, base_url: &Url, extensions: &AcceptedExtensions) -> Vec<AssetLink> {
    let document = Html::parse_document(html);
    let date = PublishedDate::from_document(&document);
    debug!(%date, "published date resolved");

    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR_WITH_HREF) {
        let Some(raw_href) = anchor.value().attr("href") else {
            continue;
        };
        let href = raw_href.trim();
        if !extensions.matches_href(href) {
            trace!(href, "skipping anchor without accepted extension");
            continue;
        }

        let source_url = match base_url.join(href) {
            Ok(url) => url,
            Err(error) => {
                debug!(href, %error, "skipping anchor that does not join to a URL");
                continue;
            }
        };

        let (filename, source) = resolve_filename(anchor, href, &source_url);
        trace!(url = %source_url, %filename, ?source, "asset link resolved");
        links.push(AssetLink::new(source_url, format!("{date} {filename}")));
    }

    debug!(count = links.len(), "resolution complete");
    links
}
