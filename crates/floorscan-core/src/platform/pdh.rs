/// Disk queue length from Windows performance counters.
///
/// Samples `\PhysicalDisk(_Total)\Current Disk Queue Length` through the PDH
/// API. The counter is instantaneous, so a single collection per sample is
/// enough and no query is kept open between batches.
use super::io_load::IoLoadSignal;
use windows::core::{w, PCWSTR};
use windows::Win32::System::Performance::{
    PdhAddEnglishCounterW, PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue,
    PdhOpenQueryW, PDH_FMT_COUNTERVALUE, PDH_FMT_DOUBLE, PDH_HCOUNTER, PDH_HQUERY,
};

// PDH status code for success (ERROR_SUCCESS).
const PDH_OK: u32 = 0;

/// Current disk queue length summed over all physical disks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdhQueueSignal;

impl IoLoadSignal for PdhQueueSignal {
    fn sample(&self) -> Option<f64> {
        let value = current_disk_queue_length();
        if value.is_none() {
            tracing::debug!("disk queue counter unavailable");
        }
        value
    }
}

/// Closes the query when the sample is done, whichever way it ends.
struct QueryGuard(PDH_HQUERY);

impl Drop for QueryGuard {
    fn drop(&mut self) {
        unsafe {
            PdhCloseQuery(self.0);
        }
    }
}

fn current_disk_queue_length() -> Option<f64> {
    let mut query = PDH_HQUERY::default();
    if unsafe { PdhOpenQueryW(PCWSTR::null(), 0, &mut query) } != PDH_OK {
        return None;
    }
    let guard = QueryGuard(query);

    let mut counter = PDH_HCOUNTER::default();
    let status = unsafe {
        PdhAddEnglishCounterW(
            guard.0,
            w!("\\PhysicalDisk(_Total)\\Current Disk Queue Length"),
            0,
            &mut counter,
        )
    };
    if status != PDH_OK {
        return None;
    }

    if unsafe { PdhCollectQueryData(guard.0) } != PDH_OK {
        return None;
    }

    let mut value = PDH_FMT_COUNTERVALUE::default();
    let status = unsafe { PdhGetFormattedCounterValue(counter, PDH_FMT_DOUBLE, None, &mut value) };
    if status != PDH_OK || value.CStatus != PDH_OK {
        return None;
    }

    let queue = unsafe { value.Anonymous.doubleValue };
    (queue.is_finite() && queue >= 0.0).then_some(queue)
}
