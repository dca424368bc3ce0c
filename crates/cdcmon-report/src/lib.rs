//! Plain-text report rendering for the CDC monitor.
//!
//! A pure presentation layer: every function here maps the structured
//! analysis results to a `String` and performs no I/O. Keeping the data
//! shape decoupled from display lets the analysis pipelines stay testable
//! on their own and the layout change without touching them.

use cdcmon_core::formatting::{format_number, format_opt_count, format_size};
use cdcmon_core::models::{ContainerSnapshot, PhaseWindow};
use cdcmon_data::analysis::{ResourceAnalysis, SyncReport};

const RULE: &str =
    "================================================================================";

/// Render the resource-usage section of the report.
pub fn render_resource_report(analysis: &ResourceAnalysis) -> String {
    let mut out = String::new();
    push_heading(&mut out, "RESOURCE USAGE BY PHASE");

    for window in &analysis.phases {
        let ts = window
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!("{:<16} at line {:<6} {}\n", window.kind.label(), window.start_line, ts));
    }
    out.push('\n');

    if !analysis.baseline.is_empty() {
        out.push_str("BASELINE CONTAINERS\n");
        render_snapshot_table(&mut out, &analysis.baseline);
        out.push('\n');
    }

    if analysis.batches.is_empty() {
        out.push_str("No insert batches found in this log.\n");
    } else {
        out.push_str(&format!(
            "{:<8} {:>10} {:>16} {:>12}\n",
            "BATCH", "AVG CPU %", "TOTAL MEM", "CONTAINERS"
        ));
        for batch in &analysis.batches {
            out.push_str(&format!(
                "{:<8} {:>10} {:>16} {:>12}\n",
                batch.batch_number,
                format_number(batch.average_cpu_percent, 2),
                format_size(batch.total_memory),
                batch.container_count
            ));
        }
    }

    match analysis.cpu_trend {
        Some(trend) => {
            out.push_str(&format!("\nCPU trend across run: {:+.2}%\n", trend));
        }
        None => out.push_str("\nCPU trend: not enough batches\n"),
    }

    if !analysis.final_snapshots.is_empty() {
        out.push_str("\nFINAL CONTAINERS\n");
        render_snapshot_table(&mut out, &analysis.final_snapshots);
    }

    out
}

/// Render the replication-consistency section of the report.
pub fn render_sync_report(report: &SyncReport) -> String {
    let mut out = String::new();
    push_heading(&mut out, "REPLICATION CONSISTENCY");

    out.push_str(&format!(
        "{:<28} {:>14} {:>14} {:>8} {:<10}\n",
        "TABLE", "SOURCE", "TARGET", "DIFF", "STATUS"
    ));
    for record in &report.records {
        let diff = record
            .diff
            .map(|d| format!("{:+}", d))
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!(
            "{:<28} {:>14} {:>14} {:>8} {:<10}\n",
            record.entity_name,
            format_opt_count(Some(record.source_count)),
            format_opt_count(record.target_count),
            diff,
            record.lag
        ));
    }
    for name in &report.skipped {
        out.push_str(&format!(
            "{:<28} {:>14} {:>14} {:>8} {:<10}\n",
            name, "N/A", "N/A", "N/A", "SKIPPED"
        ));
    }

    let totals_diff = report
        .totals
        .diff
        .map(|d| format!("{:+}", d))
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!(
        "{:<28} {:>14} {:>14} {:>8} {:<10}\n",
        "TOTAL",
        format_opt_count(Some(report.totals.source_count)),
        format_opt_count(report.totals.target_count),
        totals_diff,
        report.totals.lag
    ));

    out.push('\n');
    if let Some(size) = report.source_size {
        out.push_str(&format!("Source size: {}\n", format_size(size)));
    }
    if let Some(size) = report.target_size {
        out.push_str(&format!("Target size: {}\n", format_size(size)));
    }
    out.push_str(&format!(
        "Efficiency: {}%  ({})\n",
        format_number(report.efficiency_percent, 2),
        report.status
    ));

    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn push_heading(out: &mut String, title: &str) {
    out.push_str(RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

fn render_snapshot_table(out: &mut String, snapshots: &[ContainerSnapshot]) {
    out.push_str(&format!(
        "{:<28} {:>8} {:>16} {:>16}\n",
        "NAME", "CPU %", "MEM USED", "MEM LIMIT"
    ));
    for snap in snapshots {
        out.push_str(&format!(
            "{:<28} {:>8} {:>16} {:>16}\n",
            snap.name,
            format_number(snap.cpu_percent, 2),
            format_size(snap.memory_used),
            format_size(snap.memory_limit)
        ));
    }
}

/// Render phase windows only, used by the `resources` view when the log has
/// markers but no parsable container sections.
pub fn render_phase_list(phases: &[PhaseWindow]) -> String {
    phases
        .iter()
        .map(|w| format!("{} (line {})", w.kind.label(), w.start_line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
