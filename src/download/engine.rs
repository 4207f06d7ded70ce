//! Download engine for batches of selected assets.
//!
//! This module provides the `DownloadEngine` which runs a batch of
//! [`DownloadTask`]s under a semaphore-based concurrency limit, isolates
//! per-task failures, and reports progress, log lines and a terminal summary
//! through an [`EventSink`].
//!
//! # Example
//!
//! ```no_run
//! use assetgrab_core::download::{DownloadEngine, HttpClient, event_channel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(1, HttpClient::new())?;
//! let (events, mut rx) = event_channel();
//! let outcome = engine.run_batch(Vec::new(), events).await;
//! assert_eq!(outcome.reports.len(), 0);
//! while let Some(event) = rx.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::client::{DownloadFileResult, HttpClient, declared_content_length, stream_to_path};
use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::error::DownloadError;
use super::events::{BatchOutcome, BatchStatus, EventSink};
use super::progress::ProgressTracker;
use super::task::{DownloadOutcome, DownloadTask, TaskReport};

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Download engine for batch asset downloads.
///
/// # Concurrency Model
///
/// - Each task runs in its own Tokio task
/// - A semaphore permit is acquired, in submission order, before a task is spawned
/// - With a limit of 1 tasks run strictly one after another
/// - The terminal summary is emitted only after every task handle has been joined
///
/// # Failure Model
///
/// A failing task is logged and recorded as [`DownloadOutcome::Failed`];
/// the remaining tasks still run. Failures are never retried.
#[derive(Debug)]
pub struct DownloadEngine {
    concurrency: usize,
    client: HttpClient,
}

impl DownloadEngine {
    /// Creates a new engine with the given concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
    #[instrument(level = "debug", skip(client))]
    pub fn new(concurrency: usize, client: HttpClient) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating download engine");
        Ok(Self {
            concurrency,
            client,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs a batch to completion.
    ///
    /// Never fails: every task ends as a [`TaskReport`] and the sink always
    /// receives exactly one terminal summary.
    pub async fn run_batch(&self, tasks: Vec<DownloadTask>, events: EventSink) -> BatchOutcome {
        self.run_batch_with_interrupt(tasks, events, Arc::new(AtomicBool::new(false)))
            .await
    }

    /// Runs a batch that can be interrupted cooperatively.
    ///
    /// Raising `interrupted` stops in-flight transfers at the next chunk
    /// boundary (their partial files are removed) and fails every task that
    /// has not started yet.
    #[instrument(skip_all, fields(tasks = tasks.len(), concurrency = self.concurrency))]
    pub async fn run_batch_with_interrupt(
        &self,
        tasks: Vec<DownloadTask>,
        events: EventSink,
        interrupted: Arc<AtomicBool>,
    ) -> BatchOutcome {
        if tasks.is_empty() {
            let status = BatchStatus::NothingSelected;
            events.log(status.message());
            events.finished(status.into());
            return BatchOutcome {
                status,
                reports: Vec::new(),
            };
        }

        let total = tasks.len();
        events.log(format!("Preparing to download {total} assets..."));
        info!(total, "starting batch");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let tracker = ProgressTracker::new();
        let mut pending = Vec::with_capacity(total);
        let mut reports = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, task) in tasks.into_iter().enumerate() {
            let filename = task.filename.clone();
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                // The semaphore is local and never closed; keep the task terminal anyway.
                warn!(index, "semaphore closed; failing task");
                reports.push(TaskReport {
                    index,
                    filename,
                    outcome: DownloadOutcome::Failed {
                        reason: "scheduler unavailable".to_string(),
                    },
                });
                continue;
            };

            let client = self.client.clone();
            let tracker = Arc::clone(&tracker);
            let events = events.clone();
            let interrupted = Arc::clone(&interrupted);

            let handle = tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                let result =
                    process_task(&client, &task, index + 1, total, &tracker, &events, &interrupted)
                        .await;
                if let Err(error) = &result {
                    events.log(format!("Error: {error}"));
                }
                result
            });
            pending.push((index, filename, handle));
        }

        debug!(task_count = pending.len(), "waiting for downloads to complete");

        for (index, filename, handle) in pending {
            let outcome = match handle.await {
                Ok(Ok(result)) => DownloadOutcome::Completed {
                    path: result.path,
                    bytes: result.bytes_downloaded,
                },
                Ok(Err(error)) => {
                    cancelled |= error.is_cancelled();
                    warn!(index, file = %filename, error = %error, "download failed");
                    DownloadOutcome::Failed {
                        reason: error.to_string(),
                    }
                }
                Err(join_error) => {
                    warn!(index, error = %join_error, "download task panicked");
                    events.log(format!("Error: task for {filename} panicked"));
                    DownloadOutcome::Failed {
                        reason: format!("task panic: {join_error}"),
                    }
                }
            };
            reports.push(TaskReport {
                index,
                filename,
                outcome,
            });
        }
        reports.sort_by_key(|r| r.index);

        let failed = reports.iter().filter(|r| !r.outcome.is_completed()).count();
        let status = if cancelled {
            BatchStatus::Cancelled
        } else if failed > 0 {
            BatchStatus::EndedAbnormally
        } else {
            BatchStatus::Completed
        };
        info!(
            completed = total - failed,
            failed,
            total,
            "batch processing complete"
        );
        events.finished(status.into());

        BatchOutcome { status, reports }
    }
}

/// Fetches one task and writes it to its destination.
#[instrument(skip_all, fields(position = position, url = %task.link.source_url))]
async fn process_task(
    client: &HttpClient,
    task: &DownloadTask,
    position: usize,
    total: usize,
    tracker: &Arc<ProgressTracker>,
    events: &EventSink,
    interrupted: &AtomicBool,
) -> Result<DownloadFileResult, DownloadError> {
    let url = &task.link.source_url;
    if interrupted.load(Ordering::SeqCst) {
        return Err(DownloadError::cancelled(url.as_str()));
    }

    events.log(format!(
        "Downloading ({position}/{total}): {}",
        task.filename
    ));
    let destination = task.destination();

    let response = client.open(url).await?;
    let mut progress = tracker.start_task(declared_content_length(&response), events.clone());
    let result = stream_to_path(response, url, &destination, interrupted, |bytes| {
        progress.chunk_written(bytes);
    })
    .await?;

    debug!(
        bytes = progress.bytes_written(),
        path = %result.path.display(),
        "task finished"
    );
    events.log(format!("{} downloaded.", task.filename));
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::download::events::{BatchEvent, event_channel};

    #[test]
    fn test_engine_new_valid_concurrency() {
        let engine = DownloadEngine::new(1, HttpClient::new()).unwrap();
        assert_eq!(engine.concurrency(), 1);

        let engine = DownloadEngine::new(16, HttpClient::new()).unwrap();
        assert_eq!(engine.concurrency(), 16);
    }

    #[test]
    fn test_engine_new_invalid_concurrency_zero() {
        let result = DownloadEngine::new(0, HttpClient::new());
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_engine_new_invalid_concurrency_too_high() {
        let result = DownloadEngine::new(17, HttpClient::new());
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 17 })
        ));
    }

    #[test]
    fn test_engine_error_display() {
        let msg = EngineError::InvalidConcurrency { value: 0 }.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("16"));
    }

    #[tokio::test]
    async fn test_empty_batch_reports_nothing_selected() {
        let engine = DownloadEngine::new(1, HttpClient::new()).unwrap();
        let (events, mut rx) = event_channel();

        let outcome = engine.run_batch(Vec::new(), events).await;

        assert_eq!(outcome.status, BatchStatus::NothingSelected);
        assert!(outcome.reports.is_empty());
        assert_eq!(
            rx.recv().await.unwrap(),
            BatchEvent::Log("No assets selected.".to_string())
        );
        match rx.recv().await.unwrap() {
            BatchEvent::Finished(summary) => {
                assert_eq!(summary.status, BatchStatus::NothingSelected);
                assert_eq!(summary.message, "No assets selected.");
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }
}
