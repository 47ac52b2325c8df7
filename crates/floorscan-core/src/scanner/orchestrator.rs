/// Scan orchestration: discovery, batched size resolution, filtering,
/// conversion and ordering.
///
/// Batches run strictly one after another. Before each batch the worker
/// count is decided (fixed, or by the [`ThroughputController`] from one
/// sample of the I/O-load signal), the batch is resolved on a rayon pool of
/// exactly that size, and the loop waits for every worker before moving on.
/// Cancellation is honoured at these boundaries only.
use crate::config::{ConcurrencyConfig, ScanConfig, SortOrder};
use crate::error::{Result, ScanError};
use crate::model::{convert, AccessFailure, DisplayEntry, ScanTarget, SizedEntry};
use crate::platform::IoLoadSignal;
use crate::scanner::controller::ThroughputController;
use crate::scanner::depth::DepthFilter;
use crate::scanner::discovery::discover;
use crate::scanner::failures::FailureLog;
use crate::scanner::progress::ScanProgress;
use crate::scanner::resolver::resolve;
use chrono::{DateTime, Local};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Bytes per MB for the minimum-size filter.
pub const BYTES_PER_MB: u64 = 1_048_576;

/// Everything a finished (or cancelled) scan produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Canonical base path that was scanned.
    pub base_path: PathBuf,
    /// Result rows after filtering, conversion and sorting.
    pub entries: Vec<DisplayEntry>,
    /// Entries that could not be read during discovery or sizing.
    pub failures: Vec<AccessFailure>,
    /// Targets selected by the floor and item-type filter.
    pub targets_discovered: usize,
    pub batches_run: usize,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
    /// `true` when the scan stopped early at a batch boundary.
    pub cancelled: bool,
}

impl ScanReport {
    /// No entry survived discovery and filtering.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }
}

/// Optional progress channel. Send errors mean nobody is listening.
#[derive(Clone, Copy)]
struct Reporter<'a> {
    tx: Option<&'a Sender<ScanProgress>>,
}

impl Reporter<'_> {
    fn send(&self, msg: ScanProgress) {
        if let Some(tx) = self.tx {
            let _ = tx.send(msg);
        }
    }

    /// Forward failures recorded since the last call.
    fn forward_failures(&self, failures: &FailureLog) {
        for failure in failures.take_new() {
            self.send(ScanProgress::Error {
                path: failure.path.to_string_lossy().into_owned(),
                message: failure.message,
            });
        }
    }
}

/// Per-scan worker-count policy.
enum WorkerPlan {
    Fixed(usize),
    Adaptive(ThroughputController),
}

impl WorkerPlan {
    fn new(concurrency: &ConcurrencyConfig) -> Self {
        match *concurrency {
            ConcurrencyConfig::Sequential => Self::Fixed(1),
            ConcurrencyConfig::Fixed { threads } => Self::Fixed(threads),
            ConcurrencyConfig::Adaptive {
                min_threads,
                max_threads,
                initial_threads,
                queue_high,
                queue_low,
            } => Self::Adaptive(ThroughputController::new(
                min_threads,
                max_threads,
                initial_threads.unwrap_or(max_threads),
                queue_high,
                queue_low,
            )),
        }
    }

    /// Worker count for the next batch. Samples the signal in adaptive mode.
    fn next(&mut self, signal: &dyn IoLoadSignal) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Adaptive(controller) => controller.next_workers(signal.sample()),
        }
    }
}

/// The rayon pool of the previous batch, reused while the size is unchanged.
#[derive(Default)]
struct PoolCache {
    current: Option<(usize, rayon::ThreadPool)>,
}

impl PoolCache {
    fn get(&mut self, threads: usize) -> Result<&rayon::ThreadPool> {
        let pool = match self.current.take() {
            Some((n, pool)) if n == threads => pool,
            _ => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("floorscan-worker-{i}"))
                .build()
                .map_err(|e| ScanError::Worker(e.to_string()))?,
        };
        Ok(&self.current.insert((threads, pool)).1)
    }
}

/// Resolve one batch with at most `workers` threads and wait for all of them.
fn resolve_batch(
    batch: &[ScanTarget],
    workers: usize,
    pools: &mut PoolCache,
    failures: &FailureLog,
    reporter: Reporter<'_>,
    report_items: bool,
) -> Result<Vec<SizedEntry>> {
    let measure = |target: &ScanTarget| {
        let sized = resolve(target, failures);
        if report_items {
            reporter.send(ScanProgress::ItemResolved {
                path: sized.path.clone(),
                size_bytes: sized.size_bytes,
            });
        }
        sized
    };

    if workers <= 1 {
        return Ok(batch.iter().map(measure).collect());
    }
    let pool = pools.get(workers)?;
    Ok(pool.install(|| batch.par_iter().map(measure).collect()))
}

/// Canonical form of the base path, which must be an existing directory.
fn canonical_base(path: &Path) -> Result<PathBuf> {
    let canonical = std::fs::canonicalize(path).map_err(|e| {
        ScanError::invalid_input(format!("base path '{}' is not accessible: {e}", path.display()))
    })?;
    if !canonical.is_dir() {
        return Err(ScanError::invalid_input(format!(
            "base path '{}' is not a directory",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Keep entries of at least `min_size_mb`, convert them, and order them.
pub fn finalize(sized: Vec<SizedEntry>, config: &ScanConfig) -> Vec<DisplayEntry> {
    let threshold = config.min_size_mb * BYTES_PER_MB as f64;
    let mut entries: Vec<DisplayEntry> = sized
        .into_iter()
        .filter(|e| e.size_bytes as f64 >= threshold)
        .map(|e| {
            let converted = convert(e.size_bytes, config.unit);
            DisplayEntry::new(e, converted)
        })
        .collect();

    match config.sort {
        SortOrder::None => {}
        SortOrder::Ascending => entries.sort_by_key(|e| e.size_bytes),
        SortOrder::Descending => entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes)),
    }
    entries
}

/// Run a complete scan on the calling thread.
///
/// `progress` receives status messages when given; `cancel` is checked
/// before each batch. Only invalid configuration or an unusable base path
/// fail the scan. Unreadable entries end up in [`ScanReport::failures`].
pub fn run_scan(
    config: &ScanConfig,
    signal: &dyn IoLoadSignal,
    progress: Option<&Sender<ScanProgress>>,
    cancel: &AtomicBool,
) -> Result<ScanReport> {
    config.validate()?;
    let base = canonical_base(&config.base_path)?;
    let reporter = Reporter { tx: progress };
    let started_at = Local::now();
    let start = Instant::now();

    if config.shallow && config.floor != 1 {
        warn!(
            "Shallow scan only looks at immediate children; floor {} treated as 1",
            config.floor
        );
    }
    info!(
        "Scanning {} (floor {}, {:?}, {:?})",
        base.display(),
        config.floor,
        config.floor_mode,
        config.item_type
    );

    let filter = DepthFilter::new(
        config.floor,
        config.floor_mode,
        config.item_type,
        config.shallow,
    );
    let failures = FailureLog::new();
    let targets = discover(&base, &filter, &failures);

    let batch_size = config.effective_batch_size();
    let total_batches = targets.len().div_ceil(batch_size);
    reporter.send(ScanProgress::Discovered {
        targets: targets.len(),
        batches: total_batches,
    });
    reporter.forward_failures(&failures);

    if targets.is_empty() {
        info!("No entries matched floor {} under {}", config.floor, base.display());
    }

    let mut plan = WorkerPlan::new(&config.concurrency);
    let mut pools = PoolCache::default();
    let mut sized = Vec::with_capacity(targets.len());
    let mut batches_run = 0;
    let mut cancelled = false;

    for (index, batch) in targets.chunks(batch_size).enumerate() {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }

        let workers = plan.next(signal);
        debug!(
            "Batch {}/{}: {} targets on {} workers",
            index + 1,
            total_batches,
            batch.len(),
            workers
        );
        reporter.send(ScanProgress::BatchStarted {
            index,
            total: total_batches,
            size: batch.len(),
            workers,
        });

        let results = resolve_batch(
            batch,
            workers,
            &mut pools,
            &failures,
            reporter,
            config.report_items,
        )?;
        sized.extend(results);
        batches_run += 1;
        reporter.forward_failures(&failures);
    }

    let entries = finalize(sized, config);
    let duration = start.elapsed();
    let failures = failures.into_vec();

    if cancelled {
        info!("Scan cancelled after {} of {} batches", batches_run, total_batches);
        reporter.send(ScanProgress::Cancelled);
    } else {
        info!(
            "Scan complete: {} entries, {} access failures in {:?}",
            entries.len(),
            failures.len(),
            duration
        );
        reporter.send(ScanProgress::Complete {
            duration,
            entries: entries.len(),
            error_count: failures.len(),
        });
    }

    Ok(ScanReport {
        base_path: base,
        entries,
        failures,
        targets_discovered: targets.len(),
        batches_run,
        started_at,
        duration,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SizeUnit, SizeValue, Tier, UnitSelection};

    fn sized(path: &str, size_bytes: u64) -> SizedEntry {
        SizedEntry {
            path: path.into(),
            size_bytes,
        }
    }

    #[test]
    fn min_size_boundary_is_inclusive() {
        let mut config = ScanConfig::new("/unused");
        config.min_size_mb = 500.0;
        let entries = finalize(
            vec![
                sized("/exact", 500 * BYTES_PER_MB),
                sized("/below", 500 * BYTES_PER_MB - BYTES_PER_MB / 100),
            ],
            &config,
        );
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/exact"]);
    }

    #[test]
    fn min_size_stays_in_mb_whatever_the_display_unit() {
        let mut config = ScanConfig::new("/unused");
        config.min_size_mb = 1.0;
        config.unit = UnitSelection::Fixed(SizeUnit::Decimal(Tier::Tera));
        let entries = finalize(
            vec![sized("/big", 2 * BYTES_PER_MB), sized("/small", 1_000)],
            &config,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].unit.symbol(), "TB");
        assert_eq!(entries[0].size, SizeValue::Rounded(0.0));
    }

    #[test]
    fn sort_orders_by_bytes_not_display_value() {
        let mut config = ScanConfig::new("/unused");
        config.unit = UnitSelection::Auto(crate::model::UnitFamily::Decimal);
        config.sort = SortOrder::Descending;
        let input = vec![
            sized("/kb", 900_000),
            sized("/gb", 2_000_000_000),
            sized("/mb", 5_000_000),
        ];
        let entries = finalize(input.clone(), &config);
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/gb", "/mb", "/kb"]);

        config.sort = SortOrder::Ascending;
        let entries = finalize(input.clone(), &config);
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/kb", "/mb", "/gb"]);

        config.sort = SortOrder::None;
        let entries = finalize(input, &config);
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/kb", "/gb", "/mb"]);
    }

    #[test]
    fn pool_cache_reuses_same_size() {
        let mut pools = PoolCache::default();
        let first = pools.get(2).unwrap() as *const rayon::ThreadPool;
        let second = pools.get(2).unwrap() as *const rayon::ThreadPool;
        assert_eq!(first, second);
        assert_eq!(pools.get(3).unwrap().current_num_threads(), 3);
    }

    #[test]
    fn missing_base_path_is_invalid_input() {
        let config = ScanConfig::new("/definitely/not/here/floorscan");
        let err = run_scan(&config, &crate::platform::NoSignal, None, &AtomicBool::new(false))
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
    }
}
