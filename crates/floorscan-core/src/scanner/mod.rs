/// Scanner module: orchestrates floor discovery and size measurement.
///
/// [`run_scan`] does the whole job on the calling thread. [`start_scan`]
/// runs it on a background thread and hands back a [`ScanHandle`] for
/// progress, cancellation and the final report.
pub mod controller;
pub mod depth;
pub mod discovery;
pub mod failures;
pub mod orchestrator;
pub mod progress;
pub mod resolver;

pub use controller::{adjust, ControllerState, ThroughputController};
pub use depth::{depth_of, DepthFilter};
pub use failures::FailureLog;
pub use orchestrator::{finalize, run_scan, ScanReport, BYTES_PER_MB};
pub use progress::ScanProgress;

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::platform::IoLoadSignal;
use crossbeam_channel::Receiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the frontend falls behind, the scanner blocks on `send` rather than
/// consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    thread: thread::JoinHandle<Result<ScanReport>>,
}

impl ScanHandle {
    /// Ask the scan to stop before its next batch.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan finishes and return its report.
    ///
    /// Drops this handle's receiver first so a full channel can never keep
    /// the scan thread from finishing.
    pub fn wait(self) -> Result<ScanReport> {
        drop(self.progress_rx);
        self.thread
            .join()
            .map_err(|_| ScanError::Worker("scan thread panicked".into()))?
    }
}

/// Start a new scan on a background thread.
pub fn start_scan(config: ScanConfig, signal: Box<dyn IoLoadSignal>) -> Result<ScanHandle> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("floorscan-scanner".into())
        .spawn(move || {
            let result = run_scan(&config, signal.as_ref(), Some(&progress_tx), &cancel_clone);
            if let Err(err) = &result {
                let _ = progress_tx.send(ScanProgress::Failed {
                    message: err.to_string(),
                });
            }
            result
        })
        .map_err(|e| ScanError::Worker(format!("failed to spawn scanner thread: {e}")))?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        thread,
    })
}
