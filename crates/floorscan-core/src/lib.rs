/// floorscan core: floor discovery, size aggregation and export.
///
/// This crate contains all scanning logic with zero terminal dependencies.
/// It is designed to be reusable across different frontends.
///
/// # Modules
///
/// - [`model`]: Scan records and byte-unit conversion.
/// - [`scanner`]: Depth filter, size resolver, adaptive controller and the
///   batch orchestrator.
/// - [`platform`]: Disk-load signal for the adaptive worker pool.
/// - [`export`]: CSV, JSON and plain-text output of result rows.
/// - [`config`]: Scan settings and validation.
/// - [`error`]: Error taxonomy.
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod platform;
pub mod scanner;

pub use config::{ConcurrencyConfig, FloorMode, ItemType, ScanConfig, SortOrder};
pub use error::{Result, ScanError};
pub use scanner::{run_scan, start_scan, ScanHandle, ScanProgress, ScanReport};
