//! Log ingestion and analysis layer for the CDC monitor.
//!
//! Responsible for reading load-test log files, extracting monitoring phases
//! and per-container resource snapshots, aggregating per-batch statistics and
//! running the top-level resource and sync analysis pipelines.

pub mod aggregator;
pub mod analysis;
pub mod containers;
pub mod phases;
pub mod reader;

pub use cdcmon_core as core;
