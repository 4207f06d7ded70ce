//! HTTP client wrapper for streaming media assets to disk.
//!
//! This module provides the `HttpClient` struct which opens streaming GET
//! requests with a browser-like User-Agent and writes response bodies to a
//! destination file in bounded chunks.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// Settings for building an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle read timeout in seconds (applies per read, not to the whole body).
    pub read_timeout_secs: u64,
    /// User-Agent override; the browser UA is used when `None` or blank.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// HTTP client for downloading assets with streaming support.
///
/// Create once and reuse for a whole batch to benefit from connection pooling.
///
/// # Example
///
/// ```no_run
/// use assetgrab_core::download::HttpClient;
/// use std::path::Path;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let url = Url::parse("https://example.com/clip.mp4")?;
/// let result = client.download_to_path(&url, Path::new("./clip.mp4")).await?;
/// println!("Wrote {} bytes", result.bytes_downloaded);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Metadata about a finished transfer.
#[derive(Debug, Clone)]
pub struct DownloadFileResult {
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written to the file.
    pub bytes_downloaded: u64,
    /// Declared content length, when the server sent one.
    pub content_length: Option<u64>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts and the browser User-Agent.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::from_config(&HttpClientConfig::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Builds a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` if the TLS backend or the
    /// system configuration cannot be initialized.
    #[instrument(level = "debug")]
    pub fn from_config(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(user_agent::effective_user_agent(config.user_agent.as_deref()))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request and rejects non-success statuses.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] or [`DownloadError::Timeout`] when
    /// the connection fails, and [`DownloadError::HttpStatus`] for 4xx/5xx.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn open(&self, url: &Url) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| map_transport_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }
        debug!(status = status.as_u16(), "response received");
        Ok(response)
    }

    /// Downloads `url` into `path` without progress reporting.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`open`](Self::open) and [`stream_to_path`].
    #[must_use = "download result contains the byte count"]
    pub async fn download_to_path(
        &self,
        url: &Url,
        path: &Path,
    ) -> Result<DownloadFileResult, DownloadError> {
        let response = self.open(url).await?;
        let never = AtomicBool::new(false);
        stream_to_path(response, url, path, &never, |_| {}).await
    }
}

/// Declared body length, treating a missing or unparsable header as unknown.
#[must_use]
pub fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Streams a response body into `path` (created or truncated).
///
/// The body is written in chunks of at most [`CHUNK_SIZE`] bytes and
/// `on_chunk` is called after each one. `interrupted` is checked between
/// chunks. On any error the partially written file is removed.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] for filesystem failures,
/// [`DownloadError::Network`]/[`DownloadError::Timeout`] if the body stream
/// breaks, and [`DownloadError::Cancelled`] when `interrupted` is raised.
pub async fn stream_to_path<F>(
    response: reqwest::Response,
    url: &Url,
    path: &Path,
    interrupted: &AtomicBool,
    on_chunk: F,
) -> Result<DownloadFileResult, DownloadError>
where
    F: FnMut(usize),
{
    let content_length = declared_content_length(&response);
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let result = write_body(&mut file, response, url, path, interrupted, on_chunk).await;
    drop(file);

    match result {
        Ok(bytes_downloaded) => {
            info!(path = %path.display(), bytes = bytes_downloaded, "download complete");
            Ok(DownloadFileResult {
                path: path.to_path_buf(),
                bytes_downloaded,
                content_length,
            })
        }
        Err(error) => {
            debug!(path = %path.display(), error = %error, "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
            Err(error)
        }
    }
}

async fn write_body<F>(
    file: &mut File,
    response: reqwest::Response,
    url: &Url,
    path: &Path,
    interrupted: &AtomicBool,
    mut on_chunk: F,
) -> Result<u64, DownloadError>
where
    F: FnMut(usize),
{
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        if interrupted.load(Ordering::SeqCst) {
            return Err(DownloadError::cancelled(url.as_str()));
        }
        let chunk = chunk_result.map_err(|e| map_transport_error(url.as_str(), e))?;

        for piece in chunk.chunks(CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
            bytes_written += piece.len() as u64;
            on_chunk(piece.len());
        }
    }

    file.flush().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(bytes_written)
}

fn map_transport_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}
