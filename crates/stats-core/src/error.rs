use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the session statistics pipeline.
#[derive(Error, Debug)]
pub enum StatsError {
    /// The input log could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be written to its destination.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A session line appeared before any user line.
    #[error("Orphan session at line {line_number}: no prior user declared")]
    OrphanSession { line_number: usize },

    /// The report could not be serialised to JSON.
    #[error("Failed to serialize report: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the stats crates.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StatsError::FileRead {
            path: PathBuf::from("/some/data.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/data.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = StatsError::FileWrite {
            path: PathBuf::from("/ro/result.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file /ro/result.json"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_error_display_orphan_session() {
        let err = StatsError::OrphanSession { line_number: 1 };
        assert_eq!(
            err.to_string(),
            "Orphan session at line 1: no prior user declared"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = StatsError::Config("output path is a directory".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: output path is a directory"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StatsError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: StatsError = json_err.into();
        assert!(err.to_string().contains("Failed to serialize report"));
    }
}
