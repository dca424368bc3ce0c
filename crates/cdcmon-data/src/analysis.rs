//! Top-level analysis pipelines.
//!
//! Two independent passes share nothing but the unit normalizer and the
//! report layer: the resource pass (log lines → phases → snapshots → batch
//! summaries) and the sync pass (query results → per-table records → totals).
//! Both always complete with a best-effort result; missing data surfaces as
//! `None`, never as an error.

use chrono::Utc;

use cdcmon_core::models::{
    BatchSummary, ContainerSnapshot, PhaseKind, PhaseWindow, SyncRecord, SystemId, TableRef,
};
use cdcmon_core::query::QueryRunner;
use cdcmon_core::sync::{OverallStatus, SyncAnalyzer};
use cdcmon_core::units::SizeQuantity;

use crate::aggregator::BatchAggregator;
use crate::containers::parse_containers;
use crate::phases::parse_phases;

// ── Resource analysis ─────────────────────────────────────────────────────────

/// Metadata produced alongside a resource analysis.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of log lines scanned.
    pub lines_scanned: usize,
    /// Number of phase windows located.
    pub phases_found: usize,
    /// Number of container snapshots parsed across all windows.
    pub snapshots_parsed: usize,
}

/// The complete output of [`analyze_log`].
#[derive(Debug, Clone)]
pub struct ResourceAnalysis {
    /// Phase windows in canonical report order.
    pub phases: Vec<PhaseWindow>,
    /// Snapshots under the BASELINE marker, if one was found.
    pub baseline: Vec<ContainerSnapshot>,
    /// Per-batch summaries, ascending by batch number.
    pub batches: Vec<BatchSummary>,
    /// Snapshots under the FINAL marker, if one was found.
    pub final_snapshots: Vec<ContainerSnapshot>,
    /// First-third vs last-third CPU drift; `None` below three batches.
    pub cpu_trend: Option<f64>,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
}

/// Run the full resource pipeline over an already-materialized log.
///
/// 1. Locate phase windows ([`parse_phases`]).
/// 2. Parse container snapshots within each window ([`parse_containers`]).
/// 3. Reduce insert batches to summaries and a trend ([`BatchAggregator`]).
pub fn analyze_log(lines: &[String]) -> ResourceAnalysis {
    let phases = parse_phases(lines);

    let mut baseline: Vec<ContainerSnapshot> = Vec::new();
    let mut final_snapshots: Vec<ContainerSnapshot> = Vec::new();
    let mut batch_snapshots: Vec<(u32, Vec<ContainerSnapshot>)> = Vec::new();
    let mut snapshots_parsed = 0usize;

    for window in &phases {
        let snapshots = parse_containers(lines, window.start_line, window.kind);
        snapshots_parsed += snapshots.len();
        match window.kind {
            PhaseKind::Baseline => baseline = snapshots,
            PhaseKind::Final => final_snapshots = snapshots,
            PhaseKind::InsertBatch(n) => batch_snapshots.push((n, snapshots)),
        }
    }

    let batches = BatchAggregator::summarize(&batch_snapshots);
    let cpu_trend = BatchAggregator::cpu_trend(&batches);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        lines_scanned: lines.len(),
        phases_found: phases.len(),
        snapshots_parsed,
    };

    ResourceAnalysis {
        phases,
        baseline,
        batches,
        final_snapshots,
        cpu_trend,
        metadata,
    }
}

// ── Sync analysis ─────────────────────────────────────────────────────────────

/// The complete output of [`analyze_sync`].
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// One record per compared table, classified with the per-table
    /// threshold.
    pub records: Vec<SyncRecord>,
    /// Tables whose source count could not be obtained at all.
    pub skipped: Vec<String>,
    /// Whole-pipeline totals, classified with the coarser total threshold.
    /// The total target is absent when any table's target was absent.
    pub totals: SyncRecord,
    /// Summed on-disk size across tables on the source, when obtainable.
    pub source_size: Option<SizeQuantity>,
    /// Summed on-disk size across tables on the target, when obtainable.
    pub target_size: Option<SizeQuantity>,
    /// `target / source * 100` over tables where both sides answered.
    pub efficiency_percent: f64,
    /// Health band derived purely from the efficiency.
    pub status: OverallStatus,
}

/// Compare source and target for each table and derive pipeline totals.
///
/// Acquisition failures never abort the pass: an absent source count moves
/// the table to `skipped`, an absent target count yields a `NO_TARGET`
/// record, and both propagate into the totals as absent markers.
pub fn analyze_sync(runner: &dyn QueryRunner, tables: &[TableRef]) -> SyncReport {
    let mut records: Vec<SyncRecord> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for table in tables {
        let source = runner.query_row_count(SystemId::Source, table);
        let target = runner.query_row_count(SystemId::Target, table);
        match source {
            Some(source_count) => {
                records.push(SyncAnalyzer::compare(table.qualified(), source_count, target));
            }
            None => skipped.push(table.qualified()),
        }
    }

    let total_source: i64 = records.iter().map(|r| r.source_count).sum();
    let total_target: Option<i64> = records
        .iter()
        .map(|r| r.target_count)
        .collect::<Option<Vec<i64>>>()
        .map(|counts| counts.iter().sum());
    let totals = SyncAnalyzer::compare_totals("all tables", total_source, total_target);

    // Efficiency is best-effort: only tables where both sides answered.
    let (paired_source, paired_target) = records
        .iter()
        .filter_map(|r| r.target_count.map(|t| (r.source_count, t)))
        .fold((0i64, 0i64), |(s, t), (rs, rt)| (s + rs, t + rt));
    let efficiency_percent = SyncAnalyzer::efficiency_percent(paired_source, paired_target);

    SyncReport {
        records,
        skipped,
        totals,
        source_size: sum_sizes(runner, SystemId::Source, tables),
        target_size: sum_sizes(runner, SystemId::Target, tables),
        efficiency_percent,
        status: OverallStatus::from_efficiency(efficiency_percent),
    }
}

/// Sum on-disk table sizes for one system, normalized to KiB.
///
/// Returns `None` when no table on that system reported a size.
fn sum_sizes(
    runner: &dyn QueryRunner,
    system: SystemId,
    tables: &[TableRef],
) -> Option<SizeQuantity> {
    let sizes: Vec<SizeQuantity> = tables
        .iter()
        .filter_map(|t| runner.query_size_bytes(system, t))
        .map(|bytes| SizeQuantity::from_bytes(bytes.max(0) as u64))
        .collect();
    if sizes.is_empty() {
        None
    } else {
        Some(sizes.into_iter().sum())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
