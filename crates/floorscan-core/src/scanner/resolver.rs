/// Size resolution: total bytes under one scan target.
///
/// Files report their own length. Directories are walked to the bottom with
/// `jwalk`, regardless of the floor or shallow setting used for discovery,
/// and every non-directory length is summed. Anything that cannot be read
/// is logged in the [`FailureLog`] and counts as 0 bytes.
///
/// The walk runs with `Parallelism::Serial`: the resolver is itself called
/// from a worker of the batch pool, and the batch's worker count is the
/// only parallelism the scan is allowed.
use crate::model::{AccessFailure, EntryKind, ScanPhase, ScanTarget, SizedEntry};
use crate::scanner::failures::FailureLog;
use std::path::Path;

/// Compute the size of `target`, recording unreadable items in `failures`.
pub fn resolve(target: &ScanTarget, failures: &FailureLog) -> SizedEntry {
    let size_bytes = match target.kind {
        EntryKind::File => file_size(&target.path, failures),
        EntryKind::Directory => directory_size(&target.path, failures),
    };
    SizedEntry {
        path: target.path.to_string_lossy().into_owned(),
        size_bytes,
    }
}

/// Length of a single file without following symlinks; 0 when unreadable.
fn file_size(path: &Path, failures: &FailureLog) -> u64 {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            failures.record(AccessFailure::from_io(path.to_path_buf(), &err, ScanPhase::Sizing));
            0
        }
    }
}

/// Recursive sum of every non-directory entry below `root`.
fn directory_size(root: &Path, failures: &FailureLog) -> u64 {
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    let mut total: u64 = 0;
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                failures.record(AccessFailure::from_walk(root, &err, ScanPhase::Sizing));
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if let Some(err) = &entry.read_children_error {
                failures.record(AccessFailure::from_walk(&entry.path(), err, ScanPhase::Sizing));
            }
            continue;
        }
        total = total.saturating_add(file_size(&entry.path(), failures));
    }
    total
}
