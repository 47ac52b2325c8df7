/// Records that flow through a scan: discovered targets, their resolved
/// sizes, the display rows built from them, and the access failures met
/// along the way.
use super::size::{ConvertedSize, SizeUnit, SizeValue};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Whether a discovered entry is a directory or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn from_file_type(file_type: &std::fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// An entry selected for measurement during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Absolute path (the base path is canonicalised before discovery).
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Path components below the base path.
    pub depth: usize,
}

impl ScanTarget {
    pub fn new(path: PathBuf, kind: EntryKind, depth: usize) -> Self {
        Self { path, kind, depth }
    }
}

/// A target together with its total size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedEntry {
    pub path: String,
    pub size_bytes: u64,
}

/// A result row as shown to the user or written to an export file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEntry {
    #[serde(rename = "Size")]
    pub size: SizeValue,
    #[serde(rename = "Unit")]
    pub unit: SizeUnit,
    #[serde(rename = "Path")]
    pub path: String,
    /// Raw byte total, kept so ordering never depends on the display unit.
    #[serde(skip)]
    pub size_bytes: u64,
}

impl DisplayEntry {
    pub fn new(entry: SizedEntry, converted: ConvertedSize) -> Self {
        Self {
            size: converted.value,
            unit: converted.unit,
            path: entry.path,
            size_bytes: entry.size_bytes,
        }
    }
}

/// Scan stage in which an access failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Discovery,
    Sizing,
}

/// An entry that could not be read. Never fatal; it contributes 0 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessFailure {
    pub path: PathBuf,
    pub kind: io::ErrorKind,
    pub message: String,
    pub phase: ScanPhase,
}

impl AccessFailure {
    pub fn from_io(path: PathBuf, err: &io::Error, phase: ScanPhase) -> Self {
        Self {
            path,
            kind: err.kind(),
            message: err.to_string(),
            phase,
        }
    }

    /// Build from a `jwalk` error, which may or may not wrap an I/O error.
    pub fn from_walk(fallback: &std::path::Path, err: &jwalk::Error, phase: ScanPhase) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| fallback.to_path_buf());
        let kind = err
            .io_error()
            .map(|e| e.kind())
            .unwrap_or(io::ErrorKind::Other);
        Self {
            path,
            kind,
            message: err.to_string(),
            phase,
        }
    }
}
