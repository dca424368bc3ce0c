use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Replication health reporting for CDC pipelines
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cdc-monitor",
    about = "Replication health reporting for CDC pipelines",
    version
)]
pub struct Settings {
    /// Report to produce
    #[arg(long, default_value = "full", value_parser = ["resources", "sync", "full"])]
    pub view: String,

    /// Load-test log file to analyse
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory to search for log files (most recent .log is used)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Source database connection string
    #[arg(long, env = "CDCMON_SOURCE_DSN")]
    pub source_dsn: Option<String>,

    /// Target store connection string
    #[arg(long, env = "CDCMON_TARGET_DSN")]
    pub target_dsn: Option<String>,

    /// Tables to compare, as schema.name pairs
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Whether the selected view needs the resource-log analysis.
    pub fn wants_resources(&self) -> bool {
        self.view == "resources" || self.view == "full"
    }

    /// Whether the selected view needs the sync comparison.
    pub fn wants_sync(&self) -> bool {
        self.view == "sync" || self.view == "full"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
