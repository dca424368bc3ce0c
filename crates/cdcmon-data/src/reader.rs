//! Log file discovery and loading.
//!
//! Reads the resource-usage log produced by the load-test harness into an
//! ordered line sequence for the parsers, and discovers `.log` files when the
//! user points the monitor at a directory instead of a single file.

use std::path::{Path, PathBuf};

use cdcmon_core::error::{MonitorError, Result};
use tracing::{debug, warn};

/// Read `path` into an ordered sequence of lines.
///
/// The log is UTF-8 text, one event per line. The whole file is materialized
/// up front; the parsers operate on the full line sequence.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| MonitorError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Find all `.log` files recursively under `dir`, sorted by path.
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Log path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "log")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Pick the most recent log file under `dir`.
///
/// Files are named with a sortable timestamp by the harness, so the last
/// path in sorted order is the newest run.
pub fn latest_log_file(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        return Err(MonitorError::LogPathNotFound(dir.to_path_buf()));
    }
    find_log_files(dir)
        .into_iter()
        .next_back()
        .ok_or_else(|| MonitorError::NoLogFiles(dir.to_path_buf()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
