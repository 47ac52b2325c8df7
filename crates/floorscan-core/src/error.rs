/// Error types for the scanning engine.
///
/// Only failures on explicit inputs and on output files are errors.
/// Unreadable entries met during traversal are data ([`AccessFailure`]),
/// and an empty result is a valid report, not an error.
///
/// [`AccessFailure`]: crate::model::AccessFailure
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Top-level error type for floorscan-core.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A caller-supplied value is out of range (floor of 0, missing base
    /// path, negative byte count, inverted thread bounds, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested unit token is unknown or belongs to the other family.
    #[error("invalid unit '{unit}' for {family} units")]
    InvalidUnit { unit: String, family: &'static str },

    /// Filesystem error on a path the caller asked for directly.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV export failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A batch worker pool could not be built, or the scan thread failed
    /// to spawn or panicked.
    #[error("worker error: {0}")]
    Worker(String),
}

impl ScanError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_unit_message_names_family() {
        let err = ScanError::InvalidUnit {
            unit: "KiB".into(),
            family: "decimal",
        };
        assert_eq!(err.to_string(), "invalid unit 'KiB' for decimal units");
    }

    #[test]
    fn worker_error_message() {
        let err = ScanError::Worker("scan thread panicked".into());
        assert_eq!(err.to_string(), "worker error: scan thread panicked");
    }

    #[test]
    fn io_error_message_includes_path() {
        let err = ScanError::io(
            "/no/such/dir",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/no/such/dir"), "got {msg}");
        assert!(msg.contains("gone"), "got {msg}");
    }
}
