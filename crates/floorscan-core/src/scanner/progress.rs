/// Scan progress reporting: lightweight messages sent from the scan
/// thread to the frontend via a crossbeam channel.
use std::time::Duration;

/// Progress updates sent while a scan runs.
///
/// The results themselves are returned by the scan; these messages carry
/// only counters and status.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Discovery finished.
    Discovered { targets: usize, batches: usize },
    /// A batch is about to be dispatched.
    BatchStarted {
        index: usize,
        total: usize,
        size: usize,
        workers: usize,
    },
    /// One target was measured (only when item reporting is enabled).
    ItemResolved { path: String, size_bytes: u64 },
    /// A non-fatal error (e.g. permission denied on one file).
    Error { path: String, message: String },
    /// Scanning completed.
    Complete {
        duration: Duration,
        entries: usize,
        error_count: usize,
    },
    /// The scan stopped at a batch boundary because cancellation was requested.
    Cancelled,
    /// The scan could not start (invalid input, unreadable base path).
    Failed { message: String },
}
