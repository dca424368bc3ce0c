//! Query capability consumed by the sync analysis.
//!
//! The monitor never talks to a database itself; it is handed an
//! implementation of [`QueryRunner`] by the application layer (in practice a
//! thin wrapper over the external database CLIs). Any acquisition failure is
//! expressed as `None` so the analysis can degrade to an "absent" result
//! instead of aborting.

use crate::models::{SystemId, TableRef};

/// Read-only row-count and size queries against one side of the pipeline.
pub trait QueryRunner {
    /// Number of rows in `table` on `system`, or `None` when the query
    /// failed or the table does not exist there.
    fn query_row_count(&self, system: SystemId, table: &TableRef) -> Option<i64>;

    /// On-disk size of `table` on `system` in bytes, or `None` on failure.
    fn query_size_bytes(&self, system: SystemId, table: &TableRef) -> Option<i64>;
}
