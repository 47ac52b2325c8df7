/// Floor selection: decides which discovered entries get measured.
use crate::config::{FloorMode, ItemType};
use crate::model::EntryKind;
use std::path::Path;

/// Number of path components `candidate` has below `base`.
///
/// Returns `None` when `candidate` is not inside `base`.
pub fn depth_of(base: &Path, candidate: &Path) -> Option<usize> {
    candidate
        .strip_prefix(base)
        .ok()
        .map(|rest| rest.components().count())
}

/// Pure predicate over (depth, kind) for one scan's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthFilter {
    floor: usize,
    mode: FloorMode,
    item_type: ItemType,
    shallow: bool,
}

impl DepthFilter {
    pub fn new(floor: usize, mode: FloorMode, item_type: ItemType, shallow: bool) -> Self {
        Self {
            floor,
            mode,
            item_type,
            shallow,
        }
    }

    /// Deepest level discovery has to enumerate.
    pub fn max_depth(&self) -> usize {
        if self.shallow {
            1
        } else {
            self.floor
        }
    }

    pub fn matches(&self, depth: usize, kind: EntryKind) -> bool {
        let depth_ok = if self.shallow {
            depth == 1
        } else {
            match self.mode {
                FloorMode::AtMost => (1..=self.floor).contains(&depth),
                FloorMode::Exact => depth == self.floor,
            }
        };
        depth_ok && self.kind_matches(kind)
    }

    fn kind_matches(&self, kind: EntryKind) -> bool {
        matches!(
            (self.item_type, kind),
            (ItemType::Both, _)
                | (ItemType::Directory, EntryKind::Directory)
                | (ItemType::File, EntryKind::File)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIR: EntryKind = EntryKind::Directory;
    const FILE: EntryKind = EntryKind::File;

    #[test]
    fn depth_counts_components_below_base() {
        let base = Path::new("/a");
        assert_eq!(depth_of(base, Path::new("/a")), Some(0));
        assert_eq!(depth_of(base, Path::new("/a/b")), Some(1));
        assert_eq!(depth_of(base, Path::new("/a/b/c")), Some(2));
        assert_eq!(depth_of(base, Path::new("/a/b/c/d")), Some(3));
        assert_eq!(depth_of(base, Path::new("/other/b")), None);
    }

    #[test]
    fn at_most_mode_accepts_everything_up_to_floor() {
        let filter = DepthFilter::new(2, FloorMode::AtMost, ItemType::Directory, false);
        assert!(filter.matches(1, DIR));
        assert!(filter.matches(2, DIR));
        assert!(!filter.matches(3, DIR));
        assert!(!filter.matches(0, DIR), "the base itself is never a target");
    }

    #[test]
    fn exact_mode_accepts_only_the_floor() {
        let filter = DepthFilter::new(2, FloorMode::Exact, ItemType::Directory, false);
        assert!(!filter.matches(1, DIR));
        assert!(filter.matches(2, DIR));
        assert!(!filter.matches(3, DIR));
    }

    #[test]
    fn item_type_filters_kind() {
        let dirs = DepthFilter::new(1, FloorMode::AtMost, ItemType::Directory, false);
        let files = DepthFilter::new(1, FloorMode::AtMost, ItemType::File, false);
        let both = DepthFilter::new(1, FloorMode::AtMost, ItemType::Both, false);
        assert!(dirs.matches(1, DIR) && !dirs.matches(1, FILE));
        assert!(files.matches(1, FILE) && !files.matches(1, DIR));
        assert!(both.matches(1, FILE) && both.matches(1, DIR));
    }

    #[test]
    fn shallow_forces_immediate_children() {
        let filter = DepthFilter::new(3, FloorMode::Exact, ItemType::Directory, true);
        assert_eq!(filter.max_depth(), 1);
        assert!(filter.matches(1, DIR));
        assert!(!filter.matches(3, DIR));
    }
}
