//! Batch notifications delivered to a single consumer.
//!
//! The engine runs on its own tokio tasks and pushes [`BatchEvent`]s through
//! an unbounded channel; the consumer (a terminal UI, a GUI loop) awaits the
//! receiver instead of polling engine state.

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use super::task::TaskReport;

/// One notification from a running batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Overall percent complete, 0..=100.
    Progress(u8),
    /// Human-readable line describing a notable event.
    Log(String),
    /// Terminal summary; always the last event of a batch.
    Finished(BatchSummary),
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No tasks were supplied.
    NothingSelected,
    /// Every task completed.
    Completed,
    /// At least one task failed.
    EndedAbnormally,
    /// The interrupt flag was raised before every task finished.
    Cancelled,
}

impl BatchStatus {
    /// Terminal message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NothingSelected => "No assets selected.",
            Self::Completed => "All downloads completed!",
            Self::EndedAbnormally => "Download batch ended abnormally.",
            Self::Cancelled => "Download batch cancelled.",
        }
    }
}

/// Terminal summary event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// How the batch ended.
    pub status: BatchStatus,
    /// Message for display.
    pub message: String,
}

impl From<BatchStatus> for BatchSummary {
    fn from(status: BatchStatus) -> Self {
        Self {
            status,
            message: status.message().to_string(),
        }
    }
}

/// Structured result of a batch, one report per submitted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// How the batch ended.
    pub status: BatchStatus,
    /// Per-task reports in submission order.
    pub reports: Vec<TaskReport>,
}

impl BatchOutcome {
    /// Number of completed tasks.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_completed())
            .count()
    }

    /// Number of failed tasks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.completed()
    }

    /// Terminal message for this outcome.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}

/// Sending half handed to the engine.
///
/// Sends never fail from the engine's point of view: once the consumer
/// drops its receiver, further events are discarded.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<BatchEvent>>,
}

impl EventSink {
    /// Wraps an existing sender.
    #[must_use]
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that drops every event (library callers that only want the outcome).
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    pub(crate) fn progress(&self, percent: u8) {
        debug!(percent, "batch progress");
        self.send(BatchEvent::Progress(percent.min(100)));
    }

    pub(crate) fn log(&self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "assetgrab::batch", "{line}");
        self.send(BatchEvent::Log(line));
    }

    pub(crate) fn finished(&self, summary: BatchSummary) {
        info!(status = ?summary.status, "{}", summary.message);
        self.send(BatchEvent::Finished(summary));
    }

    fn send(&self, event: BatchEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Creates a connected sink/receiver pair.
#[must_use]
pub fn event_channel() -> (EventSink, UnboundedReceiver<BatchEvent>) {
    let (tx, rx) = unbounded_channel();
    (EventSink::new(tx), rx)
}
