//! Per-container resource snapshot extraction.
//!
//! Each phase marker is followed, within a bounded window, by one or more
//! container-stats sections: a section header (`DOCKER STATS:` or a named
//! group header such as `PEERDB CONTAINERS:`), a `NAME … CPU … MEM` table
//! header and then one container per row. Rows are best-effort: anything
//! that does not parse degrades to a skipped row or a zero quantity instead
//! of aborting the scan.

use std::collections::HashSet;

use cdcmon_core::models::{ContainerSnapshot, PhaseKind};
use cdcmon_core::units::SizeQuantity;
use regex::Regex;
use tracing::debug;

use crate::phases::is_phase_marker;

/// Maximum number of lines scanned past a phase marker.
pub const MAX_WINDOW_LINES: usize = 100;

/// Parse container snapshots from the window starting at `window_start`.
///
/// The scan covers at most [`MAX_WINDOW_LINES`] lines or to end of input,
/// whichever is smaller. It ends early at the next phase marker (the
/// following window's start line), or at a blank line or `===` separator
/// once a section has been entered; a new section header re-enters header
/// handling so overlapping groups in the same window are all consumed.
/// Duplicate container names within one window are dropped, first wins.
pub fn parse_containers(
    lines: &[String],
    window_start: usize,
    phase: PhaseKind,
) -> Vec<ContainerSnapshot> {
    let header_re =
        Regex::new(r"^(DOCKER STATS:|[A-Z][A-Z0-9 _-]* CONTAINERS:)").expect("regex is valid");

    let end = (window_start + MAX_WINDOW_LINES).min(lines.len());
    let mut snapshots: Vec<ContainerSnapshot> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut in_section = false;

    for (index, line) in lines.iter().enumerate().take(end).skip(window_start) {
        let trimmed = line.trim();

        // The window's own marker sits on the start line; any later marker
        // belongs to the next phase and ends this window.
        if index > window_start && is_phase_marker(line) {
            break;
        }

        if header_re.is_match(trimmed) {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        if trimmed.is_empty() || is_separator(trimmed) {
            break;
        }
        if is_table_header(trimmed) {
            continue;
        }

        if let Some(snapshot) = parse_row(trimmed, phase) {
            // First occurrence wins: the same container may appear under two
            // overlapping section headers.
            if seen.insert(snapshot.name.clone()) {
                snapshots.push(snapshot);
            }
        }
    }

    debug!(
        "Window at line {}: {} container snapshots for {}",
        window_start,
        snapshots.len(),
        phase
    );
    snapshots
}

/// Parse one container row: `<name> <cpu%> <used> / <limit> …`.
///
/// Returns `None` when the row cannot be split into at least three fields;
/// a memory field that does not parse yields a zero quantity instead.
fn parse_row(line: &str, phase: PhaseKind) -> Option<ContainerSnapshot> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        debug!("Skipping short container row: {line:?}");
        return None;
    }

    let name = fields[0].to_string();
    let cpu_percent = fields[1]
        .trim_end_matches('%')
        .parse::<f64>()
        .unwrap_or(0.0)
        .max(0.0);

    // Memory is either one pre-joined "used/limit" token or the split
    // sequence "<used> / <limit>".
    let (used, limit) = if let Some((u, l)) = fields[2].split_once('/') {
        (SizeQuantity::parse(u), SizeQuantity::parse(l))
    } else if fields.len() >= 5 && fields[3] == "/" {
        (
            SizeQuantity::parse(fields[2]),
            SizeQuantity::parse(fields[4]),
        )
    } else {
        (SizeQuantity::parse(fields[2]), SizeQuantity::ZERO)
    };

    Some(ContainerSnapshot {
        name,
        cpu_percent,
        memory_used: used,
        memory_limit: limit,
        phase,
    })
}

/// A separator line of repeated `=`.
fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '=')
}

/// The `NAME … CPU … MEM` table header row emitted by the stats command.
fn is_table_header(line: &str) -> bool {
    line.contains("NAME") && line.contains("CPU") && line.contains("MEM")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
