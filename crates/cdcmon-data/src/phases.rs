//! Phase extraction from the load-test log.
//!
//! The harness writes three kinds of checkpoint markers into the log:
//! `BASELINE` before load, `INSERT-BATCH-<n>` during the Nth write batch and
//! `FINAL` after the load. Each marker anchors a window of subsequent lines
//! that the container-stats parser scans.

use cdcmon_core::models::{PhaseKind, PhaseWindow};
use chrono::NaiveDateTime;
use regex::Regex;
use tracing::debug;

/// Scan the full line sequence and return the phase windows in canonical
/// report order: BASELINE (if found), insert batches ascending by batch
/// number, FINAL (if found) — independent of their physical order in the
/// file.
///
/// All `INSERT-BATCH-<n>` markers are collected across the entire file;
/// `BASELINE` and `FINAL` match their first occurrence only. A log with no
/// batch markers yields no batch windows, which is not an error.
pub fn parse_phases(lines: &[String]) -> Vec<PhaseWindow> {
    let batch_re = Regex::new(r"INSERT-BATCH-(\d+)").expect("regex is valid");

    let mut baseline: Option<PhaseWindow> = None;
    let mut final_phase: Option<PhaseWindow> = None;
    let mut batches: Vec<PhaseWindow> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if let Some(caps) = batch_re.captures(line) {
            if let Ok(number) = caps[1].parse::<u32>() {
                batches.push(PhaseWindow {
                    kind: PhaseKind::InsertBatch(number),
                    start_line: index,
                    timestamp: timestamp_near(lines, index),
                });
            }
            continue;
        }

        let trimmed = line.trim_end();
        if baseline.is_none() && trimmed.ends_with("BASELINE") {
            baseline = Some(PhaseWindow {
                kind: PhaseKind::Baseline,
                start_line: index,
                timestamp: timestamp_near(lines, index),
            });
        } else if final_phase.is_none() && trimmed.ends_with("FINAL") {
            final_phase = Some(PhaseWindow {
                kind: PhaseKind::Final,
                start_line: index,
                timestamp: timestamp_near(lines, index),
            });
        }
    }

    // Ascending batch number; stable, so file order breaks ties.
    batches.sort_by_key(|w| w.kind.batch_number());

    debug!(
        "Found {} batch markers, baseline: {}, final: {}",
        batches.len(),
        baseline.is_some(),
        final_phase.is_some()
    );

    baseline
        .into_iter()
        .chain(batches)
        .chain(final_phase)
        .collect()
}

/// Look for a `YYYY-MM-DD HH:MM:SS` timestamp on the marker line or the one
/// immediately after it. Absence is not an error.
fn timestamp_near(lines: &[String], index: usize) -> Option<NaiveDateTime> {
    extract_timestamp(&lines[index]).or_else(|| lines.get(index + 1).and_then(|l| extract_timestamp(l)))
}

/// Whether `line` carries any phase marker.
///
/// Used by the container parser as a hard window terminator: a snapshot
/// window never extends past the next phase's start line.
pub fn is_phase_marker(line: &str) -> bool {
    let batch_re = Regex::new(r"INSERT-BATCH-\d+").expect("regex is valid");
    if batch_re.is_match(line) {
        return true;
    }
    let trimmed = line.trim_end();
    trimmed.ends_with("BASELINE") || trimmed.ends_with("FINAL")
}

/// Extract the first `YYYY-MM-DD HH:MM:SS` token in `line`, if any.
pub fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    let re = Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").expect("regex is valid");
    let m = re.find(line)?;
    NaiveDateTime::parse_from_str(m.as_str(), "%Y-%m-%d %H:%M:%S").ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
