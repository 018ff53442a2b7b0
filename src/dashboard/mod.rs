//! Dashboard aggregation engine — turns raw appointment/result/bill records
//! into categorized cost breakdowns, currency-aware totals, and a unified
//! chronological timeline.
//!
//! The computation itself is pure and synchronous over collections handed in
//! explicitly; the async entry points here only fan out the three store
//! fetches and hand the materialized collections to the builders. No state
//! is kept between requests — every call recomputes from scratch.

mod breakdown;
mod currency;
mod stats;
mod timeline;
mod types;

pub use breakdown::*;
pub use currency::*;
pub use stats::*;
pub use timeline::*;
pub use types::*;

use thiserror::Error;
use tokio::try_join;

use crate::db::{DatabaseError, RecordStore};
use crate::models::{Appointment, Bill, TestResult};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to fetch {collection}: {source}")]
    Fetch {
        collection: &'static str,
        source: DatabaseError,
    },
}

/// Fetch the dashboard snapshot: fan out the three collection reads, then
/// aggregate in memory. Fails whole if any one fetch fails — there is no
/// partial-data mode.
pub async fn dashboard_stats(store: &RecordStore) -> Result<DashboardStats, DashboardError> {
    let (appointments, results, bills) = fetch_collections(store).await?;
    let now = chrono::Local::now().naive_local();
    tracing::debug!(
        appointments = appointments.len(),
        results = results.len(),
        bills = bills.len(),
        "computing dashboard stats"
    );
    Ok(build_dashboard_stats(&appointments, &results, &bills, now))
}

/// Fetch the unified timeline across all three entity types.
pub async fn timeline_events(store: &RecordStore) -> Result<Vec<TimelineEvent>, DashboardError> {
    let (appointments, results, bills) = fetch_collections(store).await?;
    Ok(build_timeline_events(&appointments, &results, &bills))
}

type Collections = (Vec<Appointment>, Vec<TestResult>, Vec<Bill>);

async fn fetch_collections(store: &RecordStore) -> Result<Collections, DashboardError> {
    try_join!(
        async {
            store
                .fetch_appointments()
                .await
                .map_err(|source| DashboardError::Fetch {
                    collection: "appointments",
                    source,
                })
        },
        async {
            store
                .fetch_results()
                .await
                .map_err(|source| DashboardError::Fetch {
                    collection: "results",
                    source,
                })
        },
        async {
            store
                .fetch_bills()
                .await
                .map_err(|source| DashboardError::Fetch {
                    collection: "bills",
                    source,
                })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_appointment, insert_bill, insert_result};
    use crate::db::open_database;
    use chrono::{Duration, Local};
    use uuid::Uuid;

    fn store_with_db(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("records.db"))
    }

    #[tokio::test]
    async fn empty_database_yields_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_db(&dir);

        let stats = dashboard_stats(&store).await.unwrap();
        assert_eq!(stats.total_appointments, 0);
        assert!(stats.upcoming_appointments.is_empty());
        assert!(stats.recent_results.is_empty());
        assert!(stats.recent_bills.is_empty());
        assert!(stats.category_breakdown.is_empty());
        assert_eq!(stats.primary_currency, "USD");
        assert_eq!(stats.total_costs.this_year, 0.0);

        let events = timeline_events(&store).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_aggregation() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_db(&dir);
        let now = Local::now().naive_local();

        let conn = open_database(store.path()).unwrap();

        let appt = crate::models::Appointment {
            id: Uuid::new_v4(),
            date: now + Duration::days(3),
            doctor_name: "Dr. Rojas".into(),
            specialty: Some("Cardiology".into()),
            medical_center: None,
            notes: None,
            created_at: now - Duration::days(10),
            updated_at: now - Duration::days(10),
        };
        insert_appointment(&conn, &appt).unwrap();

        let res = crate::models::TestResult {
            id: Uuid::new_v4(),
            appointment_id: Some(appt.id),
            test_name: "ECG".into(),
            test_type: Some("Cardio Tests".into()),
            value: None,
            unit: None,
            reference_range: None,
            notes: None,
            created_at: now - Duration::days(9),
        };
        insert_result(&conn, &res).unwrap();

        let bill = crate::models::Bill {
            id: Uuid::new_v4(),
            appointment_id: Some(appt.id),
            result_id: None,
            amount: 200.0,
            insurance_coverage: Some(150.0),
            currency: "USD".into(),
            payment_date: Some(now - Duration::days(8)),
            payment_method: None,
            notes: None,
            created_at: now - Duration::days(8),
        };
        insert_bill(&conn, &bill).unwrap();

        let stats = dashboard_stats(&store).await.unwrap();
        assert_eq!(stats.total_appointments, 1);
        assert_eq!(stats.upcoming_appointments.len(), 1);
        assert_eq!(stats.recent_results.len(), 1);
        assert_eq!(stats.recent_bills.len(), 1);
        assert_eq!(
            stats.recent_bills[0]
                .related_appointment
                .as_ref()
                .unwrap()
                .id,
            appt.id
        );
        assert_eq!(stats.primary_currency, "USD");
        assert_eq!(stats.category_breakdown.len(), 1);
        assert_eq!(stats.category_breakdown[0].category, "Cardiology");
        assert_eq!(stats.category_breakdown[0].user_paid, 50.0);

        let events = timeline_events(&store).await.unwrap();
        assert_eq!(events.len(), 3);
        // Result inherits the linked appointment's (future) date
        let res_event = events.iter().find(|e| e.id == res.id).unwrap();
        assert_eq!(res_event.date, appt.date);
    }

    #[tokio::test]
    async fn fetch_failure_names_the_collection() {
        // Point the store at a directory: every fetch fails to open.
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());

        let err = dashboard_stats(&store).await.unwrap_err();
        let DashboardError::Fetch { collection, .. } = err;
        assert!(["appointments", "results", "bills"].contains(&collection));
    }
}
