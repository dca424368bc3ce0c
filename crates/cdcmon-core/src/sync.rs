//! Replication-consistency analysis.
//!
//! Compares row counts between the source database and the target store and
//! classifies how far behind the target is. Two distinct near-sync thresholds
//! exist in the source domain: a tight one for per-table CDC checks and a
//! looser one for whole-pipeline totals. They are kept as separate constants
//! on purpose; do not unify them.

use crate::models::{LagClass, SyncRecord};

/// Maximum absolute row-count difference still considered near-sync for a
/// single-table CDC check.
pub const NEAR_SYNC_TABLE_THRESHOLD: i64 = 5;

/// Maximum absolute row-count difference still considered near-sync when
/// comparing whole-pipeline totals.
pub const NEAR_SYNC_TOTAL_THRESHOLD: i64 = 10;

/// Overall pipeline health band, derived purely from replication efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// Efficiency >= 95%.
    NearRealTime,
    /// Efficiency >= 80%.
    AcceptableLag,
    /// Anything below 80%.
    SignificantLag,
}

impl OverallStatus {
    /// Band an efficiency percentage into a status.
    pub fn from_efficiency(efficiency_percent: f64) -> Self {
        if efficiency_percent >= 95.0 {
            OverallStatus::NearRealTime
        } else if efficiency_percent >= 80.0 {
            OverallStatus::AcceptableLag
        } else {
            OverallStatus::SignificantLag
        }
    }

    /// Human-readable label used in the report.
    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::NearRealTime => "near real-time",
            OverallStatus::AcceptableLag => "acceptable lag",
            OverallStatus::SignificantLag => "significant lag",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── SyncAnalyzer ──────────────────────────────────────────────────────────────

/// Stateless collection of source/target comparison calculations.
pub struct SyncAnalyzer;

impl SyncAnalyzer {
    /// Classify a source/target count pair against the given threshold.
    pub fn classify(source: i64, target: Option<i64>, near_sync_threshold: i64) -> LagClass {
        let target = match target {
            Some(t) => t,
            None => return LagClass::NoTarget,
        };
        let diff = (target - source).abs();
        if diff == 0 {
            LagClass::Synced
        } else if diff <= near_sync_threshold {
            LagClass::NearSync
        } else {
            LagClass::Lag
        }
    }

    /// Compare one replicated table using the per-table CDC threshold.
    pub fn compare(entity_name: impl Into<String>, source: i64, target: Option<i64>) -> SyncRecord {
        Self::compare_with_threshold(entity_name, source, target, NEAR_SYNC_TABLE_THRESHOLD)
    }

    /// Compare whole-pipeline totals using the coarser total threshold.
    pub fn compare_totals(
        entity_name: impl Into<String>,
        source: i64,
        target: Option<i64>,
    ) -> SyncRecord {
        Self::compare_with_threshold(entity_name, source, target, NEAR_SYNC_TOTAL_THRESHOLD)
    }

    fn compare_with_threshold(
        entity_name: impl Into<String>,
        source: i64,
        target: Option<i64>,
        threshold: i64,
    ) -> SyncRecord {
        SyncRecord {
            entity_name: entity_name.into(),
            source_count: source,
            target_count: target,
            diff: target.map(|t| t - source),
            lag: Self::classify(source, target, threshold),
        }
    }

    /// Replication efficiency: `target / source * 100`.
    ///
    /// Returns `0.0` when the source count is zero, never divides by zero.
    pub fn efficiency_percent(source: i64, target: i64) -> f64 {
        if source == 0 {
            return 0.0;
        }
        target as f64 / source as f64 * 100.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── classify / compare ───────────────────────────────────────────────────

    #[test]
    fn test_compare_equal_counts_synced() {
        let rec = SyncAnalyzer::compare("public.orders", 100, Some(100));
        assert_eq!(rec.lag, LagClass::Synced);
        assert_eq!(rec.diff, Some(0));
    }

    #[test]
    fn test_compare_within_table_threshold_near_sync() {
        let rec = SyncAnalyzer::compare("public.orders", 100, Some(97));
        assert_eq!(rec.lag, LagClass::NearSync);
        assert_eq!(rec.diff, Some(-3));
    }

    #[test]
    fn test_compare_at_table_threshold_boundary() {
        assert_eq!(
            SyncAnalyzer::compare("t", 100, Some(95)).lag,
            LagClass::NearSync
        );
        assert_eq!(SyncAnalyzer::compare("t", 100, Some(94)).lag, LagClass::Lag);
    }

    #[test]
    fn test_compare_large_diff_lag() {
        let rec = SyncAnalyzer::compare("public.orders", 100, Some(50));
        assert_eq!(rec.lag, LagClass::Lag);
        assert_eq!(rec.diff, Some(-50));
    }

    #[test]
    fn test_compare_absent_target_no_target() {
        let rec = SyncAnalyzer::compare("public.orders", 100, None);
        assert_eq!(rec.lag, LagClass::NoTarget);
        assert_eq!(rec.target_count, None);
        assert_eq!(rec.diff, None);
    }

    #[test]
    fn test_compare_target_ahead_uses_absolute_diff() {
        // A target ahead of the source is still near-sync within threshold.
        assert_eq!(
            SyncAnalyzer::compare("t", 100, Some(103)).lag,
            LagClass::NearSync
        );
    }

    // ── the two thresholds stay distinct ─────────────────────────────────────

    #[test]
    fn test_total_threshold_is_coarser_than_table_threshold() {
        assert_eq!(NEAR_SYNC_TABLE_THRESHOLD, 5);
        assert_eq!(NEAR_SYNC_TOTAL_THRESHOLD, 10);

        // A diff of 8 lags for a per-table check but is near-sync for totals.
        assert_eq!(
            SyncAnalyzer::compare("t", 100, Some(92)).lag,
            LagClass::Lag
        );
        assert_eq!(
            SyncAnalyzer::compare_totals("all", 100, Some(92)).lag,
            LagClass::NearSync
        );
    }

    // ── efficiency ───────────────────────────────────────────────────────────

    #[test]
    fn test_efficiency_basic() {
        let e = SyncAnalyzer::efficiency_percent(200, 190);
        assert!((e - 95.0).abs() < 1e-9, "efficiency = {e}");
    }

    #[test]
    fn test_efficiency_zero_source() {
        assert_eq!(SyncAnalyzer::efficiency_percent(0, 100), 0.0);
    }

    #[test]
    fn test_efficiency_full() {
        assert_eq!(SyncAnalyzer::efficiency_percent(100, 100), 100.0);
    }

    // ── overall status banding ───────────────────────────────────────────────

    #[test]
    fn test_overall_status_bands() {
        assert_eq!(
            OverallStatus::from_efficiency(100.0),
            OverallStatus::NearRealTime
        );
        assert_eq!(
            OverallStatus::from_efficiency(95.0),
            OverallStatus::NearRealTime
        );
        assert_eq!(
            OverallStatus::from_efficiency(94.99),
            OverallStatus::AcceptableLag
        );
        assert_eq!(
            OverallStatus::from_efficiency(80.0),
            OverallStatus::AcceptableLag
        );
        assert_eq!(
            OverallStatus::from_efficiency(79.99),
            OverallStatus::SignificantLag
        );
        assert_eq!(
            OverallStatus::from_efficiency(0.0),
            OverallStatus::SignificantLag
        );
    }

    #[test]
    fn test_overall_status_labels() {
        assert_eq!(OverallStatus::NearRealTime.to_string(), "near real-time");
        assert_eq!(OverallStatus::AcceptableLag.to_string(), "acceptable lag");
        assert_eq!(OverallStatus::SignificantLag.to_string(), "significant lag");
    }
}
