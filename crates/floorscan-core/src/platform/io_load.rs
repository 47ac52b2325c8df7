/// I/O-load signal: the adaptive controller's feedback input.
///
/// A provider returns a disk-queue-depth-like reading, or `None` when no
/// reading can be taken. `None` is a neutral sample: the controller keeps
/// its worker count.
use std::path::PathBuf;
use tracing::debug;

/// Source of the queue-depth reading sampled at each batch boundary.
pub trait IoLoadSignal: Send + Sync {
    fn sample(&self) -> Option<f64>;
}

/// A signal that is never available. Adaptive scans keep their initial
/// worker count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignal;

impl IoLoadSignal for NoSignal {
    fn sample(&self) -> Option<f64> {
        None
    }
}

/// A constant reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedSignal(pub f64);

impl IoLoadSignal for FixedSignal {
    fn sample(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// Total number of in-flight I/O requests across whole block devices.
///
/// Reads `/proc/diskstats` ("I/Os currently in progress", the 12th column)
/// and keeps only devices listed in `/sys/block`, so partitions are not
/// counted twice. `loop`, `ram` and `zram` devices are ignored. The values
/// are summed, like the `_Total` instance of the Windows disk queue counter,
/// so one saturated disk among idle ones still reads as load. On other
/// platforms, or when the files cannot be read, the signal is unavailable.
#[derive(Debug, Clone)]
pub struct DiskQueueSignal {
    diskstats: PathBuf,
    sys_block: PathBuf,
}

impl Default for DiskQueueSignal {
    fn default() -> Self {
        Self {
            diskstats: PathBuf::from("/proc/diskstats"),
            sys_block: PathBuf::from("/sys/block"),
        }
    }
}

impl DiskQueueSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from alternative locations instead of `/proc` and `/sys`.
    pub fn with_paths(diskstats: impl Into<PathBuf>, sys_block: impl Into<PathBuf>) -> Self {
        Self {
            diskstats: diskstats.into(),
            sys_block: sys_block.into(),
        }
    }

    fn whole_devices(&self) -> Option<Vec<String>> {
        let dir = std::fs::read_dir(&self.sys_block).ok()?;
        let names = dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !is_virtual_device(name))
            .collect();
        Some(names)
    }
}

impl IoLoadSignal for DiskQueueSignal {
    fn sample(&self) -> Option<f64> {
        if !cfg!(target_os = "linux") {
            return None;
        }
        let devices = self.whole_devices()?;
        let stats = match std::fs::read_to_string(&self.diskstats) {
            Ok(s) => s,
            Err(err) => {
                debug!("disk queue signal unavailable: {}", err);
                return None;
            }
        };
        total_in_flight(&stats, &devices)
    }
}

fn is_virtual_device(name: &str) -> bool {
    ["loop", "ram", "zram"].iter().any(|p| name.starts_with(p))
}

/// Sum of the in-flight column over `devices`; `None` if none of them appear.
pub fn total_in_flight(diskstats: &str, devices: &[String]) -> Option<f64> {
    let mut total = 0u64;
    let mut found = false;
    for line in diskstats.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 12 {
            continue;
        }
        if !devices.iter().any(|d| d == fields[2]) {
            continue;
        }
        if let Ok(in_flight) = fields[11].parse::<u64>() {
            total = total.saturating_add(in_flight);
            found = true;
        }
    }
    found.then(|| total as f64)
}

/// Signal that samples the disk queue where supported.
#[cfg(windows)]
pub fn default_signal() -> Box<dyn IoLoadSignal> {
    Box::new(super::pdh::PdhQueueSignal)
}

/// Signal that samples the disk queue where supported.
#[cfg(not(windows))]
pub fn default_signal() -> Box<dyn IoLoadSignal> {
    if std::path::Path::new("/proc/diskstats").exists() {
        Box::new(DiskQueueSignal::new())
    } else {
        Box::new(NoSignal)
    }
}
