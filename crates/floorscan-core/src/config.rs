/// Scan configuration and validation.
///
/// `ScanConfig` is plain data with public fields; frontends fill it in and
/// the orchestrator calls [`ScanConfig::validate`] before touching the disk.
use crate::error::{Result, ScanError};
use crate::model::UnitSelection;
use std::path::PathBuf;

/// Queue depth above which the adaptive controller sheds a worker.
pub const DEFAULT_QUEUE_HIGH: f64 = 2.0;
/// Queue depth below which the adaptive controller adds a worker.
pub const DEFAULT_QUEUE_LOW: f64 = 1.0;
/// Upper bound for any worker count.
pub const MAX_WORKERS: usize = 512;

/// Which kinds of entry at the floor are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemType {
    #[default]
    Directory,
    File,
    Both,
}

/// How the floor selects entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloorMode {
    /// Every entry whose depth is between 1 and the floor.
    #[default]
    AtMost,
    /// Only entries exactly at the floor.
    Exact,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep discovery order.
    #[default]
    None,
    Ascending,
    Descending,
}

/// Worker-pool policy for size resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConcurrencyConfig {
    /// Resolve every target on the calling thread.
    Sequential,
    /// Constant pool size for every batch.
    Fixed { threads: usize },
    /// Pool size chosen per batch from the I/O-load signal.
    Adaptive {
        min_threads: usize,
        max_threads: usize,
        /// Starting worker count; `None` starts at `max_threads`.
        initial_threads: Option<usize>,
        queue_high: f64,
        queue_low: f64,
    },
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self::Adaptive {
            min_threads: 1,
            max_threads: num_cpus::get().clamp(1, MAX_WORKERS),
            initial_threads: None,
            queue_high: DEFAULT_QUEUE_HIGH,
            queue_low: DEFAULT_QUEUE_LOW,
        }
    }
}

impl ConcurrencyConfig {
    /// Batch size used when none is configured.
    pub fn default_batch_size(&self) -> usize {
        match *self {
            Self::Sequential => 1,
            Self::Fixed { threads } => threads,
            Self::Adaptive { max_threads, .. } => max_threads.saturating_mul(2),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Sequential => Ok(()),
            Self::Fixed { threads } if threads == 0 => {
                Err(ScanError::invalid_input("thread count must be at least 1"))
            }
            Self::Fixed { threads } if threads > MAX_WORKERS => Err(ScanError::invalid_input(
                format!("thread count ({threads}) exceeds {MAX_WORKERS}"),
            )),
            Self::Fixed { .. } => Ok(()),
            Self::Adaptive {
                min_threads,
                max_threads,
                initial_threads,
                queue_high,
                queue_low,
            } => {
                if min_threads == 0 {
                    return Err(ScanError::invalid_input("minimum threads must be at least 1"));
                }
                if max_threads > MAX_WORKERS {
                    return Err(ScanError::invalid_input(format!(
                        "maximum threads ({max_threads}) exceeds {MAX_WORKERS}"
                    )));
                }
                if min_threads > max_threads {
                    return Err(ScanError::invalid_input(format!(
                        "minimum threads ({min_threads}) exceeds maximum threads ({max_threads})"
                    )));
                }
                if let Some(initial) = initial_threads {
                    if !(min_threads..=max_threads).contains(&initial) {
                        return Err(ScanError::invalid_input(format!(
                            "initial threads ({initial}) outside {min_threads}..={max_threads}"
                        )));
                    }
                }
                if !queue_high.is_finite() || !queue_low.is_finite() || queue_low > queue_high {
                    return Err(ScanError::invalid_input(format!(
                        "queue thresholds must satisfy low <= high (low {queue_low}, high {queue_high})"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Everything the orchestrator needs for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub base_path: PathBuf,
    /// Target depth below `base_path`, at least 1.
    pub floor: usize,
    pub floor_mode: FloorMode,
    pub item_type: ItemType,
    /// Only consider immediate children during discovery.
    pub shallow: bool,
    /// Inclusive lower bound, always in MB (1 MB = 1_048_576 bytes).
    pub min_size_mb: f64,
    pub unit: UnitSelection,
    pub sort: SortOrder,
    /// Targets per batch; `None` derives it from `concurrency`.
    pub batch_size: Option<usize>,
    pub concurrency: ConcurrencyConfig,
    /// Emit a progress event for every resolved target.
    pub report_items: bool,
}

impl ScanConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            floor: 1,
            floor_mode: FloorMode::default(),
            item_type: ItemType::default(),
            shallow: false,
            min_size_mb: 0.0,
            unit: UnitSelection::default(),
            sort: SortOrder::default(),
            batch_size: None,
            concurrency: ConcurrencyConfig::default(),
            report_items: false,
        }
    }

    /// Batch size in effect for this scan.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or_else(|| self.concurrency.default_batch_size())
            .max(1)
    }

    /// Check every value the scan depends on, except the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.floor == 0 {
            return Err(ScanError::invalid_input("floor must be a positive integer"));
        }
        if !self.min_size_mb.is_finite() || self.min_size_mb < 0.0 {
            return Err(ScanError::invalid_input(format!(
                "minimum size must be a non-negative number of MB, got {}",
                self.min_size_mb
            )));
        }
        if self.batch_size == Some(0) {
            return Err(ScanError::invalid_input("batch size must be at least 1"));
        }
        self.concurrency.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adaptive(min: usize, max: usize, high: f64, low: f64) -> ConcurrencyConfig {
        ConcurrencyConfig::Adaptive {
            min_threads: min,
            max_threads: max,
            initial_threads: None,
            queue_high: high,
            queue_low: low,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::new("/tmp");
        assert!(config.validate().is_ok());
        assert_eq!(config.floor, 1);
        assert_eq!(config.item_type, ItemType::Directory);
        assert_eq!(config.floor_mode, FloorMode::AtMost);
    }

    #[test]
    fn zero_floor_is_rejected() {
        let mut config = ScanConfig::new("/tmp");
        config.floor = 0;
        assert!(matches!(config.validate(), Err(ScanError::InvalidInput(_))));
    }

    #[test]
    fn negative_min_size_is_rejected() {
        let mut config = ScanConfig::new("/tmp");
        config.min_size_mb = -1.0;
        assert!(config.validate().is_err());
        config.min_size_mb = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut config = ScanConfig::new("/tmp");
        config.concurrency = adaptive(8, 4, 2.0, 1.0);
        assert!(config.validate().is_err());
        config.concurrency = adaptive(0, 4, 2.0, 1.0);
        assert!(config.validate().is_err());
        config.concurrency = adaptive(1, 4, 1.0, 2.0);
        assert!(config.validate().is_err());
        config.concurrency = ConcurrencyConfig::Fixed { threads: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_thread_counts_are_rejected_without_overflow() {
        let mut config = ScanConfig::new("/tmp");
        config.concurrency = adaptive(1, usize::MAX, 2.0, 1.0);
        assert_eq!(config.effective_batch_size(), usize::MAX);
        assert!(matches!(config.validate(), Err(ScanError::InvalidInput(_))));

        config.concurrency = adaptive(1, MAX_WORKERS, 2.0, 1.0);
        assert!(config.validate().is_ok());

        config.concurrency = ConcurrencyConfig::Fixed {
            threads: MAX_WORKERS + 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn batch_size_defaults_follow_concurrency() {
        let mut config = ScanConfig::new("/tmp");
        config.concurrency = adaptive(1, 16, 2.0, 1.0);
        assert_eq!(config.effective_batch_size(), 32);
        config.concurrency = ConcurrencyConfig::Fixed { threads: 6 };
        assert_eq!(config.effective_batch_size(), 6);
        config.concurrency = ConcurrencyConfig::Sequential;
        assert_eq!(config.effective_batch_size(), 1);
        config.batch_size = Some(10);
        assert_eq!(config.effective_batch_size(), 10);
    }
}
