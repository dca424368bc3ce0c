//! Per-batch aggregation over the replication-relevant containers.
//!
//! Only containers that participate in replication throughput count toward a
//! batch's statistics: the replication worker, the source-catalog proxy, the
//! workflow engine and the target store. Sidecars (admin UIs, exporters) are
//! excluded so they cannot dilute the signal.

use cdcmon_core::models::{BatchSummary, ContainerSnapshot};
use cdcmon_core::units::SizeQuantity;
use tracing::debug;

/// Name substrings identifying the containers that matter for replication
/// throughput.
pub const RELEVANT_CONTAINERS: [&str; 4] = ["flow-worker", "catalog", "temporal", "clickhouse"];

/// Whether a container participates in the batch aggregate.
pub fn is_relevant(name: &str) -> bool {
    RELEVANT_CONTAINERS.iter().any(|s| name.contains(s))
}

// ── BatchAggregator ───────────────────────────────────────────────────────────

/// Stateless reduction of per-batch snapshots into summary statistics.
pub struct BatchAggregator;

impl BatchAggregator {
    /// Reduce each batch's snapshots to a [`BatchSummary`].
    ///
    /// Batches whose snapshots contain no relevant container are silently
    /// skipped: they produce no summary rather than an error.
    pub fn summarize(batches: &[(u32, Vec<ContainerSnapshot>)]) -> Vec<BatchSummary> {
        batches
            .iter()
            .filter_map(|(batch_number, snapshots)| {
                let relevant: Vec<&ContainerSnapshot> = snapshots
                    .iter()
                    .filter(|s| is_relevant(&s.name))
                    .collect();
                if relevant.is_empty() {
                    debug!("Batch {batch_number}: no relevant containers, skipped");
                    return None;
                }

                let cpu_sum: f64 = relevant.iter().map(|s| s.cpu_percent).sum();
                let total_memory: SizeQuantity =
                    relevant.iter().map(|s| s.memory_used).sum();

                Some(BatchSummary {
                    batch_number: *batch_number,
                    average_cpu_percent: round2(cpu_sum / relevant.len() as f64),
                    total_memory,
                    container_count: relevant.len(),
                })
            })
            .collect()
    }

    /// Performance drift across the run: mean CPU of the last third of
    /// batches minus the mean CPU of the first third (`n/3` floor).
    ///
    /// Returns `None` when fewer than three summaries exist — too little
    /// data for a meaningful trend. A rising value signals resource pressure
    /// building under sustained load.
    pub fn cpu_trend(summaries: &[BatchSummary]) -> Option<f64> {
        let n = summaries.len();
        if n < 3 {
            return None;
        }
        let third = n / 3;
        let mean = |slice: &[BatchSummary]| {
            slice.iter().map(|s| s.average_cpu_percent).sum::<f64>() / slice.len() as f64
        };
        let first = mean(&summaries[..third]);
        let last = mean(&summaries[n - third..]);
        Some(round2(last - first))
    }
}

/// Round to two decimal places, half away from zero.
///
/// Nudged by a half ULP so binary representations sitting just below a
/// decimal midpoint still round up, matching the unit normalizer.
fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let epsilon = (f64::EPSILON * scaled.abs()).copysign(scaled);
    (scaled + epsilon).round() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cdcmon_core::models::PhaseKind;

    fn snap(name: &str, cpu: f64, mem_kib: f64, batch: u32) -> ContainerSnapshot {
        ContainerSnapshot {
            name: name.to_string(),
            cpu_percent: cpu,
            memory_used: SizeQuantity::from_kib(mem_kib),
            memory_limit: SizeQuantity::from_kib(mem_kib * 4.0),
            phase: PhaseKind::InsertBatch(batch),
        }
    }

    fn summary(batch: u32, cpu: f64) -> BatchSummary {
        BatchSummary {
            batch_number: batch,
            average_cpu_percent: cpu,
            total_memory: SizeQuantity::ZERO,
            container_count: 1,
        }
    }

    // ── relevance filter ─────────────────────────────────────────────────────

    #[test]
    fn test_is_relevant_matches_substrings() {
        assert!(is_relevant("peerdb-flow-worker-1"));
        assert!(is_relevant("catalog"));
        assert!(is_relevant("temporal-server"));
        assert!(is_relevant("clickhouse-01"));
        assert!(!is_relevant("grafana"));
        assert!(!is_relevant("minio"));
    }

    // ── summarize ────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_averages_and_sums() {
        let batches = vec![(
            1_u32,
            vec![
                snap("flow-worker", 10.0, 100.0, 1),
                snap("clickhouse", 20.0, 200.0, 1),
            ],
        )];
        let summaries = BatchAggregator::summarize(&batches);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].batch_number, 1);
        assert_eq!(summaries[0].average_cpu_percent, 15.0);
        assert_eq!(summaries[0].total_memory.kib(), 300.0);
        assert_eq!(summaries[0].container_count, 2);
    }

    #[test]
    fn test_summarize_excludes_irrelevant_containers() {
        let batches = vec![(
            1_u32,
            vec![
                snap("flow-worker", 10.0, 100.0, 1),
                snap("grafana", 90.0, 900.0, 1),
            ],
        )];
        let summaries = BatchAggregator::summarize(&batches);
        assert_eq!(summaries[0].average_cpu_percent, 10.0);
        assert_eq!(summaries[0].total_memory.kib(), 100.0);
        assert_eq!(summaries[0].container_count, 1);
    }

    #[test]
    fn test_summarize_sums_memory_used_not_limit() {
        let batches = vec![(1_u32, vec![snap("flow-worker", 10.0, 100.0, 1)])];
        let summaries = BatchAggregator::summarize(&batches);
        // Limit is 400 KiB in the fixture; only the 100 KiB used counts.
        assert_eq!(summaries[0].total_memory.kib(), 100.0);
    }

    #[test]
    fn test_summarize_skips_batches_without_relevant_snapshots() {
        let batches = vec![
            (1_u32, vec![snap("grafana", 50.0, 100.0, 1)]),
            (2_u32, vec![snap("flow-worker", 30.0, 100.0, 2)]),
            (3_u32, Vec::new()),
        ];
        let summaries = BatchAggregator::summarize(&batches);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].batch_number, 2);
    }

    #[test]
    fn test_summarize_rounds_average_to_two_decimals() {
        let batches = vec![(
            1_u32,
            vec![
                snap("flow-worker", 10.0, 0.0, 1),
                snap("catalog", 10.0, 0.0, 1),
                snap("temporal", 11.0, 0.0, 1),
            ],
        )];
        let summaries = BatchAggregator::summarize(&batches);
        // 31/3 = 10.333… → 10.33
        assert_eq!(summaries[0].average_cpu_percent, 10.33);
    }

    // ── cpu_trend ────────────────────────────────────────────────────────────

    #[test]
    fn test_trend_undefined_below_three_summaries() {
        assert_eq!(BatchAggregator::cpu_trend(&[]), None);
        assert_eq!(BatchAggregator::cpu_trend(&[summary(1, 10.0)]), None);
        assert_eq!(
            BatchAggregator::cpu_trend(&[summary(1, 10.0), summary(2, 30.0)]),
            None
        );
    }

    #[test]
    fn test_trend_rising_load() {
        let summaries = vec![
            summary(1, 10.0),
            summary(2, 20.0),
            summary(3, 40.0),
        ];
        // third = 1: first third mean 10.0, last third mean 40.0.
        assert_eq!(BatchAggregator::cpu_trend(&summaries), Some(30.0));
    }

    #[test]
    fn test_trend_uses_integer_floor_of_thirds() {
        let summaries = vec![
            summary(1, 10.0),
            summary(2, 12.0),
            summary(3, 50.0),
            summary(4, 20.0),
            summary(5, 30.0),
        ];
        // n = 5 → third = 1: compares batch 1 (10.0) against batch 5 (30.0).
        assert_eq!(BatchAggregator::cpu_trend(&summaries), Some(20.0));
    }

    #[test]
    fn test_trend_falling_load_is_negative() {
        let summaries = vec![
            summary(1, 40.0),
            summary(2, 20.0),
            summary(3, 10.0),
        ];
        assert_eq!(BatchAggregator::cpu_trend(&summaries), Some(-30.0));
    }

    #[test]
    fn test_summarize_idempotent() {
        let batches = vec![(1_u32, vec![snap("flow-worker", 10.0, 100.0, 1)])];
        assert_eq!(
            BatchAggregator::summarize(&batches),
            BatchAggregator::summarize(&batches)
        );
    }
}
