//! Command-line arguments and their mapping onto `ScanConfig`.

use clap::{Parser, ValueEnum};
use floorscan_core::model::{UnitFamily, UnitSelection};
use floorscan_core::{ConcurrencyConfig, FloorMode, ItemType, ScanConfig, SortOrder};
use std::path::PathBuf;

/// Measure every folder (or file) at a given depth below a path
#[derive(Parser, Debug, Clone)]
#[command(
    name = "floorscan",
    version,
    about = "Measure every folder (or file) at a given depth below a path",
    after_help = "EXAMPLES:\n    \
        floorscan /srv/data --floor 2 --min-size-mb 500 --sort desc\n    \
        floorscan /home --unit auto-binary -o sizes.csv\n    \
        floorscan . --shallow --item-type both --threads 4"
)]
pub struct CliArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Depth below PATH whose entries are measured
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub floor: usize,

    /// How the floor selects entries
    #[arg(long, value_enum, default_value_t = FloorModeArg::AtMost)]
    pub floor_mode: FloorModeArg,

    /// Kind of entry to measure
    #[arg(short = 't', long, value_enum, default_value_t = ItemTypeArg::Directory)]
    pub item_type: ItemTypeArg,

    /// Only look at immediate children (sizes are still computed recursively)
    #[arg(long)]
    pub shallow: bool,

    /// Hide entries smaller than this many MB (1 MB = 1,048,576 bytes)
    #[arg(short, long, default_value_t = 0.0, value_name = "MB")]
    pub min_size_mb: f64,

    /// Display unit: B, KB, MB, GB, TB, KiB, MiB, GiB, TiB, auto, auto-decimal, auto-binary
    #[arg(short, long, default_value = "MB")]
    pub unit: String,

    /// Unit family the unit must belong to
    #[arg(long, value_enum)]
    pub base: Option<BaseArg>,

    /// Result ordering by size
    #[arg(short, long, value_enum, default_value_t = SortArg::None)]
    pub sort: SortArg,

    /// Targets per batch (default: 2 x max threads, or the fixed thread count)
    #[arg(short, long, value_name = "NUM")]
    pub batch_size: Option<usize>,

    /// Use a fixed worker count instead of adapting to disk load
    #[arg(short = 'j', long, value_name = "NUM", conflicts_with = "sequential")]
    pub threads: Option<usize>,

    /// Measure one entry at a time
    #[arg(long)]
    pub sequential: bool,

    /// Lower bound for the adaptive worker count
    #[arg(long, default_value_t = 1, value_name = "NUM")]
    pub min_threads: usize,

    /// Upper bound for the adaptive worker count
    #[arg(long, default_value_t = default_max_threads(), value_name = "NUM")]
    pub max_threads: usize,

    /// Disk queue depth above which a worker is removed
    #[arg(long, default_value_t = floorscan_core::config::DEFAULT_QUEUE_HIGH)]
    pub queue_high: f64,

    /// Disk queue depth below which a worker is added
    #[arg(long, default_value_t = floorscan_core::config::DEFAULT_QUEUE_LOW)]
    pub queue_low: f64,

    /// Write results to FILE (.csv, .json, anything else is a text table)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print each entry as soon as it is measured
    #[arg(long)]
    pub show_items: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn default_max_threads() -> usize {
    num_cpus::get().clamp(1, floorscan_core::config::MAX_WORKERS)
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorModeArg {
    AtMost,
    Exact,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTypeArg {
    Directory,
    File,
    Both,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseArg {
    Decimal,
    Binary,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    None,
    Asc,
    Desc,
}

impl CliArgs {
    /// Build the scan configuration. Fails on an unknown or mismatched unit.
    pub fn to_config(&self) -> floorscan_core::Result<ScanConfig> {
        let family = self.base.map(|b| match b {
            BaseArg::Decimal => UnitFamily::Decimal,
            BaseArg::Binary => UnitFamily::Binary,
        });

        let mut config = ScanConfig::new(&self.path);
        config.floor = self.floor;
        config.floor_mode = match self.floor_mode {
            FloorModeArg::AtMost => FloorMode::AtMost,
            FloorModeArg::Exact => FloorMode::Exact,
        };
        config.item_type = match self.item_type {
            ItemTypeArg::Directory => ItemType::Directory,
            ItemTypeArg::File => ItemType::File,
            ItemTypeArg::Both => ItemType::Both,
        };
        config.shallow = self.shallow;
        config.min_size_mb = self.min_size_mb;
        config.unit = UnitSelection::resolve(&self.unit, family)?;
        config.sort = match self.sort {
            SortArg::None => SortOrder::None,
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        };
        config.batch_size = self.batch_size;
        config.concurrency = if self.sequential {
            ConcurrencyConfig::Sequential
        } else if let Some(threads) = self.threads {
            ConcurrencyConfig::Fixed { threads }
        } else {
            ConcurrencyConfig::Adaptive {
                min_threads: self.min_threads,
                max_threads: self.max_threads,
                initial_threads: None,
                queue_high: self.queue_high,
                queue_low: self.queue_low,
            }
        };
        config.report_items = self.show_items;
        Ok(config)
    }
}
