//! Dashboard CLI — opens (creating if needed) the records database and
//! prints the aggregated dashboard snapshot and timeline as JSON.
//!
//! Usage: `medtrack [DB_PATH]`. Without an argument the database lives under
//! the app data directory.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;

use medtrack::dashboard::{self, DashboardStats, TimelineEvent};
use medtrack::db::RecordStore;
use medtrack::{config, init_tracing};

#[derive(Serialize)]
struct DashboardOutput {
    stats: DashboardStats,
    timeline: Vec<TimelineEvent>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            let dir = config::app_data_dir();
            if let Err(e) = std::fs::create_dir_all(&dir) {
                tracing::error!("cannot create data directory {}: {e}", dir.display());
                return ExitCode::FAILURE;
            }
            config::database_path()
        }
    };

    let store = RecordStore::new(db_path);

    let stats = match dashboard::dashboard_stats(&store).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("dashboard aggregation failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let timeline = match dashboard::timeline_events(&store).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("timeline aggregation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = DashboardOutput { stats, timeline };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("failed to serialize dashboard output: {e}");
            ExitCode::FAILURE
        }
    }
}
