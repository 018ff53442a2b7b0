use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::db::DatabaseError;
use crate::models::TestResult;

const COLUMNS: &str =
    "id, appointment_id, test_name, test_type, value, unit, reference_range, notes, created_at";

pub fn insert_result(conn: &Connection, result: &TestResult) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO results (id, appointment_id, test_name, test_type, value, unit,
         reference_range, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            result.id.to_string(),
            result.appointment_id.map(|id| id.to_string()),
            result.test_name,
            result.test_type,
            result.value,
            result.unit,
            result.reference_range,
            result.notes,
            result.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_result(conn: &Connection, id: &Uuid) -> Result<TestResult, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM results WHERE id = ?1"))?;

    let mut rows = stmt.query_map(params![id.to_string()], |row| {
        Ok(result_row_from_rusqlite(row))
    })?;

    match rows.next() {
        Some(row) => result_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "result".into(),
            id: id.to_string(),
        }),
    }
}

/// All test results, newest first.
pub fn list_results(conn: &Connection) -> Result<Vec<TestResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM results ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(result_row_from_rusqlite(row)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(result_from_row(row??)?);
    }
    Ok(results)
}

pub fn list_results_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<TestResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM results WHERE appointment_id = ?1 ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map(params![appointment_id.to_string()], |row| {
        Ok(result_row_from_rusqlite(row))
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(result_from_row(row??)?);
    }
    Ok(results)
}

pub fn update_result(conn: &Connection, result: &TestResult) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE results
         SET appointment_id = ?2, test_name = ?3, test_type = ?4, value = ?5, unit = ?6,
             reference_range = ?7, notes = ?8
         WHERE id = ?1",
        params![
            result.id.to_string(),
            result.appointment_id.map(|id| id.to_string()),
            result.test_name,
            result.test_type,
            result.value,
            result.unit,
            result.reference_range,
            result.notes,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "result".into(),
            id: result.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_result(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM results WHERE id = ?1", params![id.to_string()])?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "result".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for TestResult mapping
struct ResultRow {
    id: String,
    appointment_id: Option<String>,
    test_name: String,
    test_type: Option<String>,
    value: Option<String>,
    unit: Option<String>,
    reference_range: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

fn result_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<ResultRow, rusqlite::Error> {
    Ok(ResultRow {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        test_name: row.get(2)?,
        test_type: row.get(3)?,
        value: row.get(4)?,
        unit: row.get(5)?,
        reference_range: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn result_from_row(row: ResultRow) -> Result<TestResult, DatabaseError> {
    Ok(TestResult {
        id: parse_uuid("results.id", &row.id)?,
        appointment_id: parse_optional_uuid("results.appointment_id", row.appointment_id)?,
        test_name: row.test_name,
        test_type: row.test_type,
        value: row.value,
        unit: row.unit,
        reference_range: row.reference_range,
        notes: row.notes,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::insert_appointment;
    use crate::models::Appointment;
    use chrono::NaiveDate;

    fn datetime(date: &str, hour: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn result(created: &str, appointment_id: Option<Uuid>) -> TestResult {
        TestResult {
            id: Uuid::new_v4(),
            appointment_id,
            test_name: "HbA1c".into(),
            test_type: Some("Lab Work".into()),
            value: Some("6.1".into()),
            unit: Some("%".into()),
            reference_range: Some("4.0-5.6".into()),
            notes: None,
            created_at: datetime(created, 10),
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let conn = open_memory_database().unwrap();
        let res = result("2025-02-01", None);
        insert_result(&conn, &res).unwrap();

        let fetched = get_result(&conn, &res.id).unwrap();
        assert_eq!(fetched.id, res.id);
        assert_eq!(fetched.test_name, "HbA1c");
        assert_eq!(fetched.test_type.as_deref(), Some("Lab Work"));
        assert!(fetched.appointment_id.is_none());
    }

    #[test]
    fn list_newest_first() {
        let conn = open_memory_database().unwrap();
        let old = result("2025-01-01", None);
        let new = result("2025-03-01", None);
        insert_result(&conn, &old).unwrap();
        insert_result(&conn, &new).unwrap();

        let all = list_results(&conn).unwrap();
        assert_eq!(all[0].id, new.id);
        assert_eq!(all[1].id, old.id);
    }

    #[test]
    fn list_for_appointment_filters() {
        let conn = open_memory_database().unwrap();
        let appt = Appointment {
            id: Uuid::new_v4(),
            date: datetime("2025-02-01", 9),
            doctor_name: "Dr. Rojas".into(),
            specialty: None,
            medical_center: None,
            notes: None,
            created_at: datetime("2025-02-01", 8),
            updated_at: datetime("2025-02-01", 8),
        };
        insert_appointment(&conn, &appt).unwrap();

        let linked = result("2025-02-02", Some(appt.id));
        let unlinked = result("2025-02-03", None);
        insert_result(&conn, &linked).unwrap();
        insert_result(&conn, &unlinked).unwrap();

        let found = list_results_for_appointment(&conn, &appt.id).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, linked.id);
    }

    #[test]
    fn update_and_delete() {
        let conn = open_memory_database().unwrap();
        let mut res = result("2025-02-01", None);
        insert_result(&conn, &res).unwrap();

        res.value = Some("5.8".into());
        update_result(&conn, &res).unwrap();
        assert_eq!(
            get_result(&conn, &res.id).unwrap().value.as_deref(),
            Some("5.8")
        );

        delete_result(&conn, &res.id).unwrap();
        assert!(matches!(
            get_result(&conn, &res.id),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
