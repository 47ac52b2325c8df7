/// Platform-specific functionality: the disk-load reading that drives the
/// adaptive worker pool.

pub mod io_load;
#[cfg(windows)]
pub mod pdh;

pub use io_load::{default_signal, DiskQueueSignal, FixedSignal, IoLoadSignal, NoSignal};
#[cfg(windows)]
pub use pdh::PdhQueueSignal;
