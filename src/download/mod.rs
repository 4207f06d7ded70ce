//! Batch download engine for resolved media assets.
//!
//! This module fetches selected assets over HTTP and streams them to disk,
//! reporting aggregate progress, per-item log lines and a terminal summary.
//!
//! # Features
//!
//! - Streaming downloads in 64 KiB chunks (memory-efficient for large files)
//! - Browser-like User-Agent on every request
//! - Sequential by default, bounded concurrency on request
//! - Per-task failure isolation with a structured outcome per task
//! - Cooperative cancellation between chunks
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use assetgrab_core::AssetLink;
//! use assetgrab_core::download::{DownloadEngine, DownloadTask, HttpClient, event_channel};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let link = AssetLink::new(Url::parse("https://example.com/v/clip.mp4")?, "24.3.7 clip.mp4");
//! let tasks = DownloadTask::batch([link], Path::new("./downloads"));
//! let engine = DownloadEngine::new(1, HttpClient::new())?;
//! let (events, _rx) = event_channel();
//! let outcome = engine.run_batch(tasks, events).await;
//! println!("{} ({} completed)", outcome.message(), outcome.completed());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod events;
mod filename;
mod progress;
mod task;

pub use client::{
    DownloadFileResult, HttpClient, HttpClientConfig, declared_content_length, stream_to_path,
};
pub use constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY,
    READ_TIMEOUT_SECS,
};
pub use engine::{DownloadEngine, EngineError};
pub use error::DownloadError;
pub use events::{BatchEvent, BatchOutcome, BatchStatus, BatchSummary, EventSink, event_channel};
pub use filename::{RESERVED_CHARS, sanitize_filename};
pub use task::{DownloadOutcome, DownloadTask, TaskReport};
