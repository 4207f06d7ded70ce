//! Constants for the download module (timeouts, chunking, concurrency).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large media files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Size of each chunk written to disk between progress updates (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 16;

/// Default concurrency: one task at a time, in selection order.
pub const DEFAULT_CONCURRENCY: usize = 1;
