use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::Appointment;

const COLUMNS: &str =
    "id, date, doctor_name, specialty, medical_center, notes, created_at, updated_at";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, date, doctor_name, specialty, medical_center, notes,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.id.to_string(),
            appt.date,
            appt.doctor_name,
            appt.specialty,
            appt.medical_center,
            appt.notes,
            appt.created_at,
            appt.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = ?1"
    ))?;

    let mut rows = stmt.query_map(params![id.to_string()], |row| {
        Ok(appointment_row_from_rusqlite(row))
    })?;

    match rows.next() {
        Some(row) => appointment_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        }),
    }
}

/// All appointments, most recent date first.
pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM appointments ORDER BY date DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(appointment_row_from_rusqlite(row)))?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row??)?);
    }
    Ok(appointments)
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments
         SET date = ?2, doctor_name = ?3, specialty = ?4, medical_center = ?5, notes = ?6,
             updated_at = ?7
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.date,
            appt.doctor_name,
            appt.specialty,
            appt.medical_center,
            appt.notes,
            appt.updated_at,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Appointment mapping
struct AppointmentRow {
    id: String,
    date: NaiveDateTime,
    doctor_name: String,
    specialty: Option<String>,
    medical_center: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn appointment_row_from_rusqlite(
    row: &rusqlite::Row<'_>,
) -> Result<AppointmentRow, rusqlite::Error> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        date: row.get(1)?,
        doctor_name: row.get(2)?,
        specialty: row.get(3)?,
        medical_center: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid("appointments.id", &row.id)?,
        date: row.date,
        doctor_name: row.doctor_name,
        specialty: row.specialty,
        medical_center: row.medical_center,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
