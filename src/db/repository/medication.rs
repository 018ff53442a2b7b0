use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{Medication, ScheduleTime};

const COLUMNS: &str = "id, name, kind, strength, unit, display_name, notes, frequency,
     schedule_times, start_date, end_date, created_at, updated_at";

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, kind, strength, unit, display_name, notes, frequency,
         schedule_times, start_date, end_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            med.id.to_string(),
            med.name,
            med.kind,
            med.strength,
            med.unit,
            med.display_name,
            med.notes,
            med.frequency,
            schedule_to_json(&med.schedule_times)?,
            med.start_date,
            med.end_date,
            med.created_at,
            med.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Medication, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM medications WHERE id = ?1"))?;

    let mut rows = stmt.query_map(params![id.to_string()], |row| {
        Ok(medication_row_from_rusqlite(row))
    })?;

    match rows.next() {
        Some(row) => medication_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: id.to_string(),
        }),
    }
}

/// All medications, newest first.
pub fn list_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM medications ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(medication_row_from_rusqlite(row)))?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row??)?);
    }
    Ok(meds)
}

pub fn update_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE medications
         SET name = ?2, kind = ?3, strength = ?4, unit = ?5, display_name = ?6, notes = ?7,
             frequency = ?8, schedule_times = ?9, start_date = ?10, end_date = ?11,
             updated_at = ?12
         WHERE id = ?1",
        params![
            med.id.to_string(),
            med.name,
            med.kind,
            med.strength,
            med.unit,
            med.display_name,
            med.notes,
            med.frequency,
            schedule_to_json(&med.schedule_times)?,
            med.start_date,
            med.end_date,
            med.updated_at,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: med.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM medications WHERE id = ?1",
        params![id.to_string()],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn schedule_to_json(schedule: &Option<Vec<ScheduleTime>>) -> Result<Option<String>, DatabaseError> {
    schedule
        .as_ref()
        .map(|s| {
            serde_json::to_string(s).map_err(|e| DatabaseError::InvalidJson {
                column: "medications.schedule_times".into(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn schedule_from_json(raw: Option<String>) -> Result<Option<Vec<ScheduleTime>>, DatabaseError> {
    raw.map(|s| {
        serde_json::from_str(&s).map_err(|e| DatabaseError::InvalidJson {
            column: "medications.schedule_times".into(),
            reason: e.to_string(),
        })
    })
    .transpose()
}

// Internal row type for Medication mapping
struct MedicationRow {
    id: String,
    name: String,
    kind: String,
    strength: Option<f64>,
    unit: Option<String>,
    display_name: Option<String>,
    notes: Option<String>,
    frequency: String,
    schedule_times: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn medication_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicationRow, rusqlite::Error> {
    Ok(MedicationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        strength: row.get(3)?,
        unit: row.get(4)?,
        display_name: row.get(5)?,
        notes: row.get(6)?,
        frequency: row.get(7)?,
        schedule_times: row.get(8)?,
        start_date: row.get(9)?,
        end_date: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<Medication, DatabaseError> {
    Ok(Medication {
        id: parse_uuid("medications.id", &row.id)?,
        name: row.name,
        kind: row.kind,
        strength: row.strength,
        unit: row.unit,
        display_name: row.display_name,
        notes: row.notes,
        frequency: row.frequency,
        schedule_times: schedule_from_json(row.schedule_times)?,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
