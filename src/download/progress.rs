//! Aggregate byte progress across a batch.
//!
//! Percent complete is `sum(bytes written) / sum(declared lengths)` over the
//! tasks that declared a content length. Tasks without one never move the
//! value. With one task in flight this reduces to the per-file percentage.

use std::sync::{Arc, Mutex, PoisonError};

use super::events::EventSink;

#[derive(Debug, Default)]
struct Totals {
    written: u64,
    expected: u64,
}

impl Totals {
    fn percent(&self) -> u8 {
        if self.expected == 0 {
            return 0;
        }
        let pct = u128::from(self.written) * 100 / u128::from(self.expected);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

/// Shared accumulator; one per batch.
#[derive(Debug, Default)]
pub(crate) struct ProgressTracker {
    totals: Mutex<Totals>,
}

impl ProgressTracker {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Starts tracking one task's transfer.
    ///
    /// A missing or zero `content_length` yields a handle that never emits.
    pub(crate) fn start_task(
        self: &Arc<Self>,
        content_length: Option<u64>,
        sink: EventSink,
    ) -> TaskProgress {
        let known = content_length.filter(|len| *len > 0);
        if let Some(len) = known {
            let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
            totals.expected = totals.expected.saturating_add(len);
        }
        TaskProgress {
            tracker: Arc::clone(self),
            sink,
            known_length: known.is_some(),
            bytes_written: 0,
        }
    }

    /// Current aggregate percentage.
    pub(crate) fn percent(&self) -> u8 {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .percent()
    }

    fn advance(&self, bytes: u64, sink: &EventSink) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.written = totals.written.saturating_add(bytes);
        // Emit while holding the lock so concurrent tasks cannot reorder values.
        sink.progress(totals.percent());
    }
}

/// Per-task progress handle; its byte count only grows.
#[derive(Debug)]
pub(crate) struct TaskProgress {
    tracker: Arc<ProgressTracker>,
    sink: EventSink,
    known_length: bool,
    bytes_written: u64,
}

impl TaskProgress {
    /// Records a chunk that has been written to disk.
    pub(crate) fn chunk_written(&mut self, bytes: usize) {
        let bytes = bytes as u64;
        self.bytes_written = self.bytes_written.saturating_add(bytes);
        if self.known_length {
            self.tracker.advance(bytes, &self.sink);
        }
    }

    /// Bytes written so far by this task.
    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
