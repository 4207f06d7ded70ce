//! Assetgrab Core Library
//!
//! Finds downloadable media attachments on a rendered post page and fetches
//! them to a local directory with progress reporting.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`render`] - Page rendering (headless Chromium or a saved HTML file)
//! - [`resolver`] - Link resolution: anchors to dated, named asset links
//! - [`analyze`] - Render-then-resolve entry point
//! - [`download`] - Batch download engine with streaming writes and events

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analyze;
pub mod asset;
pub mod download;
pub mod render;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use analyze::{AnalyzeError, analyze_page, parse_page_url};
pub use asset::AssetLink;
pub use download::{
    BatchEvent, BatchOutcome, BatchStatus, DEFAULT_CONCURRENCY, DownloadEngine, DownloadTask,
    EngineError, HttpClient, HttpClientConfig, event_channel,
};
pub use render::{ChromiumRenderer, LocalFileRenderer, PageRenderer, RenderError};
pub use resolver::{AcceptedExtensions, PublishedDate, RenderedDocument, resolve};
pub use user_agent::BROWSER_USER_AGENT;
