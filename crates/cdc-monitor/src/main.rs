mod bootstrap;
mod query;

use anyhow::Result;
use clap::Parser;

use cdcmon_core::models::TableRef;
use cdcmon_core::settings::Settings;
use cdcmon_data::analysis::{analyze_log, analyze_sync};
use cdcmon_data::reader::{latest_log_file, read_log_lines};
use query::CliQueryRunner;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("CDC Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}", settings.view);

    if settings.wants_resources() {
        run_resource_report(&settings)?;
    }

    if settings.wants_sync() {
        run_sync_report(&settings);
    }

    Ok(())
}

/// Resolve the log file, run the resource pipeline and print its report.
fn run_resource_report(settings: &Settings) -> Result<()> {
    let path = match (&settings.log_file, &settings.log_dir) {
        (Some(file), _) => file.clone(),
        (None, Some(dir)) => latest_log_file(dir)?,
        (None, None) => {
            tracing::warn!("No --log-file or --log-dir given; skipping resource report");
            return Ok(());
        }
    };

    tracing::info!("Analysing log {}", path.display());
    let lines = read_log_lines(&path)?;
    let analysis = analyze_log(&lines);
    tracing::debug!(
        "Scanned {} lines, found {} phases",
        analysis.metadata.lines_scanned,
        analysis.metadata.phases_found
    );

    print!("{}", cdcmon_report::render_resource_report(&analysis));
    Ok(())
}

/// Compare the configured tables across source and target and print the
/// consistency report. Query failures degrade to absent values inside the
/// pipeline, so this never fails the run.
fn run_sync_report(settings: &Settings) {
    let tables = parse_table_refs(&settings.tables);
    if tables.is_empty() {
        tracing::warn!("No tables configured; skipping sync report");
        return;
    }

    let runner = CliQueryRunner::new(settings.source_dsn.clone(), settings.target_dsn.clone());
    let report = analyze_sync(&runner, &tables);
    print!("{}", cdcmon_report::render_sync_report(&report));
}

/// Turn `schema.name` strings into [`TableRef`]s; bare names default to the
/// `public` schema.
fn parse_table_refs(raw: &[String]) -> Vec<TableRef> {
    raw.iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| match s.split_once('.') {
            Some((schema, name)) => TableRef::new(schema, name),
            None => TableRef::new("public", s.as_str()),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
