//! CLI-backed query collaborator.
//!
//! Thin pass-through over the external database clients: `psql` for the
//! source and `clickhouse-client` for the target. The analysis core only
//! sees the [`QueryRunner`] capability; every spawn or parse failure here is
//! absorbed into `None` so the sync pass degrades to an absent result
//! instead of aborting.

use std::process::Command;

use cdcmon_core::models::{SystemId, TableRef};
use cdcmon_core::query::QueryRunner;
use tracing::{debug, warn};

/// Runs read-only count/size queries through the vendor CLIs.
pub struct CliQueryRunner {
    source_dsn: Option<String>,
    target_dsn: Option<String>,
}

impl CliQueryRunner {
    pub fn new(source_dsn: Option<String>, target_dsn: Option<String>) -> Self {
        Self {
            source_dsn,
            target_dsn,
        }
    }

    /// Spawn the client for `system` with the given SQL and parse its single
    /// integer result. Any failure along the way becomes `None`.
    fn run_scalar(&self, system: SystemId, sql: &str) -> Option<i64> {
        let mut command = match system {
            SystemId::Source => {
                let Some(dsn) = self.source_dsn.as_ref() else {
                    warn!("Source DSN not configured; skipping query");
                    return None;
                };
                let mut c = Command::new("psql");
                c.args([dsn.as_str(), "-t", "-A", "-c", sql]);
                c
            }
            SystemId::Target => {
                let Some(dsn) = self.target_dsn.as_ref() else {
                    warn!("Target DSN not configured; skipping query");
                    return None;
                };
                let mut c = Command::new("clickhouse-client");
                c.args(["--url", dsn.as_str(), "--query", sql]);
                c
            }
        };

        debug!("Running {:?} query: {sql}", system);
        let output = match command.output() {
            Ok(o) => o,
            Err(e) => {
                warn!("Failed to spawn client for {:?}: {e}", system);
                return None;
            }
        };
        if !output.status.success() {
            warn!(
                "Client for {:?} exited with {}: {}",
                system,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Unparsable scalar from {:?}: {:?}", system, stdout.trim());
                None
            }
        }
    }
}

impl QueryRunner for CliQueryRunner {
    fn query_row_count(&self, system: SystemId, table: &TableRef) -> Option<i64> {
        let sql = match system {
            SystemId::Source => format!("SELECT COUNT(*) FROM {}", table.qualified()),
            SystemId::Target => format!("SELECT count() FROM {}", table.qualified()),
        };
        self.run_scalar(system, &sql)
    }

    fn query_size_bytes(&self, system: SystemId, table: &TableRef) -> Option<i64> {
        let sql = match system {
            SystemId::Source => {
                format!("SELECT pg_total_relation_size('{}')", table.qualified())
            }
            SystemId::Target => format!(
                "SELECT sum(bytes_on_disk) FROM system.parts \
                 WHERE database = '{}' AND table = '{}' AND active",
                table.schema, table.name
            ),
        };
        self.run_scalar(system, &sql)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
