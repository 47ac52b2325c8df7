/// Data model for floorscan.
///
/// Re-exports the scan records and the unit conversion types.
pub mod entry;
pub mod size;

pub use entry::{AccessFailure, DisplayEntry, EntryKind, ScanPhase, ScanTarget, SizedEntry};
pub use size::{
    convert, convert_signed, format_count, ConvertedSize, SizeUnit, SizeValue, Tier, UnitFamily,
    UnitSelection,
};
