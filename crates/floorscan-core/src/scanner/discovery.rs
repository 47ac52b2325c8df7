/// Target discovery: walk the base path down to the floor and keep the
/// entries the [`DepthFilter`] selects.
///
/// The walk is sorted so discovery order, and therefore unsorted output, is
/// stable between runs over an unchanged tree.
use crate::model::{AccessFailure, EntryKind, ScanPhase, ScanTarget};
use crate::scanner::depth::{depth_of, DepthFilter};
use crate::scanner::failures::FailureLog;
use std::path::Path;
use tracing::debug;

/// Enumerate `base` (already canonical) and return matching targets in walk order.
pub fn discover(base: &Path, filter: &DepthFilter, failures: &FailureLog) -> Vec<ScanTarget> {
    let walker = jwalk::WalkDir::new(base)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .max_depth(filter.max_depth())
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    let mut targets = Vec::new();
    let mut visited: u64 = 0;

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                failures.record(AccessFailure::from_walk(base, &err, ScanPhase::Discovery));
                continue;
            }
        };
        visited += 1;

        let path = entry.path();
        if let Some(err) = &entry.read_children_error {
            failures.record(AccessFailure::from_walk(&path, err, ScanPhase::Discovery));
        }
        let Some(depth) = depth_of(base, &path) else {
            continue;
        };
        if depth == 0 {
            continue;
        }

        let kind = EntryKind::from_file_type(&entry.file_type());
        if filter.matches(depth, kind) {
            targets.push(ScanTarget::new(path, kind, depth));
        }
    }

    debug!(
        "Discovery visited {} entries under {}, {} targets",
        visited,
        base.display(),
        targets.len()
    );
    targets
}
