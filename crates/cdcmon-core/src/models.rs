use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::units::SizeQuantity;

/// The checkpoint a log excerpt belongs to within a load-test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "batch", rename_all = "snake_case")]
pub enum PhaseKind {
    /// Before any load is applied.
    Baseline,
    /// During the Nth write batch.
    InsertBatch(u32),
    /// After the load has finished.
    Final,
}

impl PhaseKind {
    /// The batch number, for insert-batch phases only.
    pub fn batch_number(&self) -> Option<u32> {
        match self {
            PhaseKind::InsertBatch(n) => Some(*n),
            _ => None,
        }
    }

    /// The label used in log markers and report headings.
    pub fn label(&self) -> String {
        match self {
            PhaseKind::Baseline => "BASELINE".to_string(),
            PhaseKind::InsertBatch(n) => format!("INSERT-BATCH-{}", n),
            PhaseKind::Final => "FINAL".to_string(),
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// One monitoring phase located in the log file.
///
/// The end of the window is implicit: the next phase start, a blank line, a
/// `===` separator, or the fixed maximum lookahead — whichever comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    /// Which checkpoint this is.
    pub kind: PhaseKind,
    /// 0-based index of the line where the phase marker was found.
    pub start_line: usize,
    /// Timestamp found on the marker line or the one after it, if any.
    pub timestamp: Option<NaiveDateTime>,
}

/// One container's resource reading within a phase window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// Container name as reported by the runtime.
    pub name: String,
    /// CPU usage percentage, `>= 0`.
    pub cpu_percent: f64,
    /// Memory in use.
    pub memory_used: SizeQuantity,
    /// Configured memory limit.
    pub memory_limit: SizeQuantity,
    /// The phase this reading belongs to.
    pub phase: PhaseKind,
}

/// Per-batch summary statistics over the replication-relevant containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// The insert batch this summarizes.
    pub batch_number: u32,
    /// Mean CPU% across included snapshots, rounded to 2 decimals.
    pub average_cpu_percent: f64,
    /// Sum of included snapshots' memory in use (not limits).
    pub total_memory: SizeQuantity,
    /// Number of snapshots included in the average.
    pub container_count: usize,
}

/// How far the target store lags behind the source for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LagClass {
    /// Row counts match exactly.
    Synced,
    /// Within the near-sync threshold.
    NearSync,
    /// Beyond the near-sync threshold.
    Lag,
    /// The target could not report a count at all.
    NoTarget,
}

impl std::fmt::Display for LagClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LagClass::Synced => "SYNCED",
            LagClass::NearSync => "NEAR_SYNC",
            LagClass::Lag => "LAG",
            LagClass::NoTarget => "NO_TARGET",
        };
        f.write_str(s)
    }
}

/// Row-count comparison for one replicated entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Table or dataset being compared.
    pub entity_name: String,
    /// Row count on the source system.
    pub source_count: i64,
    /// Row count on the target system; `None` when the query failed or the
    /// table does not exist there.
    pub target_count: Option<i64>,
    /// Signed `target - source` difference; `None` when the target is absent.
    pub diff: Option<i64>,
    /// Lag classification for this entity.
    pub lag: LagClass,
}

/// Which side of the replication pipeline a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemId {
    /// The relational source database.
    Source,
    /// The analytical target store.
    Target,
}

/// A schema-qualified table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// `schema.name`, as used in queries and report rows.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}
