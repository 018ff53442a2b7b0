//! Async record store — the data access adapter consumed by the dashboard.
//!
//! Wraps the synchronous repository reads in `spawn_blocking` so callers can
//! fan out the three collection fetches with `try_join!`. Each call opens its
//! own connection; SQLite handles the concurrent readers.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::{open_database, repository, DatabaseError};
use crate::models::{Appointment, Bill, TestResult};

/// Handle to the records database, cheap to clone.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All appointments, most recent date first.
    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, DatabaseError> {
        self.with_conn(repository::list_appointments).await
    }

    /// All test results, newest first. The dashboard's "recent results"
    /// slice relies on this order.
    pub async fn fetch_results(&self) -> Result<Vec<TestResult>, DatabaseError> {
        self.with_conn(repository::list_results).await
    }

    /// All bills, newest first. The dashboard's "recent bills" slice relies
    /// on this order.
    pub async fn fetch_bills(&self) -> Result<Vec<Bill>, DatabaseError> {
        self.with_conn(repository::list_bills).await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_database(&path)?;
            f(&conn)
        })
        .await
        .map_err(|e| DatabaseError::TaskFailed(e.to_string()))?
    }
}
