//! The asset link entity shared by resolution and download.

use serde::Serialize;
use url::Url;

/// A downloadable media asset found on a rendered page.
///
/// Created in bulk by [`crate::resolver::resolve`]; immutable afterwards.
/// Selection state is owned by the caller, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLink {
    /// Absolute URL of the media resource.
    pub source_url: Url,
    /// Human-meaningful filename, always `"{date} {name}"`.
    pub display_name: String,
}

impl AssetLink {
    /// Creates a new asset link.
    #[must_use]
    pub fn new(source_url: Url, display_name: impl Into<String>) -> Self {
        Self {
            source_url,
            display_name: display_name.into(),
        }
    }
}
