//! Error handling module for VidTrim

use std::path::Path;

use thiserror::Error;

/// POSIX "no space left on device"; checked by number because
/// `ErrorKind::StorageFull` is newer than our minimum toolchain.
const ENOSPC: i32 = 28;

/// Main error type for VidTrim operations
#[derive(Error, Debug)]
pub enum TrimError {
    /// Unknown asset id (after the registry fallback scan also missed)
    #[error("Asset not found: {id}")]
    NotFound { id: String },

    /// Bad request input: missing file, disallowed extension, malformed id
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Malformed timestamp text
    #[error("Invalid timestamp: {value}. Expected non-negative seconds with an optional 's' suffix, e.g. 12.500s")]
    InvalidTimestamp { value: String },

    /// Time range validation error
    #[error("Invalid time range: start ({start:.3}s) must be less than end ({end:.3}s)")]
    InvalidRange { start: f64, end: f64 },

    /// Source file vanished between asset creation and the operation
    #[error("Source file missing: {path}")]
    SourceMissing { path: String },

    /// Asset id collision on register; should not occur with generated ids
    #[error("Asset id already registered: {id}")]
    DuplicateId { id: String },

    /// The media engine exited non-zero or was interrupted
    #[error("Media engine failed: {message}")]
    EngineFailure { message: String },

    /// Disk full or permission denied; message carries the user-actionable fix
    #[error("{message}")]
    ResourceExhausted { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for VidTrim operations
pub type TrimResult<T> = std::result::Result<T, TrimError>;

impl TrimError {
    /// Classify an I/O failure into the taxonomy. Disk exhaustion and
    /// permission problems are common, user-actionable cases and get
    /// specific guidance instead of a bare errno string.
    pub fn classify_io(err: std::io::Error, path: &Path) -> Self {
        if err.raw_os_error() == Some(ENOSPC) {
            return TrimError::ResourceExhausted {
                message: "No space left on device. Please free up disk space.".to_string(),
            };
        }
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => TrimError::ResourceExhausted {
                message: format!("Permission denied. Cannot write to: {}", path.display()),
            },
            std::io::ErrorKind::BrokenPipe => TrimError::EngineFailure {
                message: format!(
                    "Encoding was interrupted (broken pipe) while writing {}. Check disk space and permissions.",
                    path.display()
                ),
            },
            _ => TrimError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_classify_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let classified = TrimError::classify_io(err, Path::new("/data/output"));
        assert!(matches!(classified, TrimError::ResourceExhausted { .. }));
        assert!(classified.to_string().contains("/data/output"));
    }

    #[test]
    fn test_classify_disk_full() {
        let err = io::Error::from_raw_os_error(28);
        let classified = TrimError::classify_io(err, Path::new("/data/output"));
        assert!(matches!(classified, TrimError::ResourceExhausted { .. }));
        assert!(classified.to_string().contains("free up disk space"));
    }

    #[test]
    fn test_classify_broken_pipe() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let classified = TrimError::classify_io(err, Path::new("/data/out.mp4"));
        assert!(matches!(classified, TrimError::EngineFailure { .. }));
    }

    #[test]
    fn test_classify_other_io_stays_io() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let classified = TrimError::classify_io(err, Path::new("x"));
        assert!(matches!(classified, TrimError::Io(_)));
    }
}
