//! Domain layer for the CDC pipeline monitor.
//!
//! Holds the value types shared across the workspace (size quantities, phase
//! and snapshot models, sync records), the unit normalizer, the sync
//! analyzer, formatting helpers and the CLI settings. This crate performs no
//! I/O; everything here is a pure function of its inputs.

pub mod error;
pub mod formatting;
pub mod models;
pub mod query;
pub mod settings;
pub mod sync;
pub mod units;
