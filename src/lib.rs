//! Medtrack — a locally-run personal medical-records tracker.
//!
//! Appointments, test results, bills, medications and insurance policies in
//! a local SQLite database, with a dashboard engine that aggregates spend,
//! coverage, and a unified timeline across record types.

pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from RUST_LOG, falling back to the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
