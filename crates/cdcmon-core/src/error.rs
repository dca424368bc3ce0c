use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the CDC monitor.
///
/// The parsing and aggregation layers are deliberately total functions and
/// never surface here; only data acquisition (file reads, external client
/// invocation) can fail.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read log file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The given log path does not exist.
    #[error("Log path not found: {0}")]
    LogPathNotFound(PathBuf),

    /// No `.log` files were found under the given directory.
    #[error("No log files found in {0}")]
    NoLogFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MonitorError::FileRead {
            path: PathBuf::from("/var/log/loadtest.log"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read log file"));
        assert!(msg.contains("/var/log/loadtest.log"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_log_path_not_found() {
        let err = MonitorError::LogPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Log path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_log_files() {
        let err = MonitorError::NoLogFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No log files found in /empty/dir");
    }

    #[test]
    fn test_error_display_config() {
        let err = MonitorError::Config("missing target DSN".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing target DSN");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MonitorError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
