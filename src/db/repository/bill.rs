use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::dashboard::normalize_currency;
use crate::db::DatabaseError;
use crate::models::Bill;

const COLUMNS: &str = "id, appointment_id, result_id, amount, insurance_coverage, currency,
     payment_date, payment_method, notes, created_at";

pub fn insert_bill(conn: &Connection, bill: &Bill) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO bills (id, appointment_id, result_id, amount, insurance_coverage, currency,
         payment_date, payment_method, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            bill.id.to_string(),
            bill.appointment_id.map(|id| id.to_string()),
            bill.result_id.map(|id| id.to_string()),
            bill.amount,
            bill.insurance_coverage,
            bill.currency,
            bill.payment_date,
            bill.payment_method,
            bill.notes,
            bill.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_bill(conn: &Connection, id: &Uuid) -> Result<Bill, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM bills WHERE id = ?1"))?;

    let mut rows = stmt.query_map(params![id.to_string()], |row| {
        Ok(bill_row_from_rusqlite(row))
    })?;

    match rows.next() {
        Some(row) => bill_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "bill".into(),
            id: id.to_string(),
        }),
    }
}

/// All bills, newest first.
pub fn list_bills(conn: &Connection) -> Result<Vec<Bill>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM bills ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(bill_row_from_rusqlite(row)))?;

    let mut bills = Vec::new();
    for row in rows {
        bills.push(bill_from_row(row??)?);
    }
    Ok(bills)
}

pub fn list_bills_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<Bill>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM bills WHERE appointment_id = ?1 ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map(params![appointment_id.to_string()], |row| {
        Ok(bill_row_from_rusqlite(row))
    })?;

    let mut bills = Vec::new();
    for row in rows {
        bills.push(bill_from_row(row??)?);
    }
    Ok(bills)
}

pub fn list_bills_for_result(conn: &Connection, result_id: &Uuid) -> Result<Vec<Bill>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM bills WHERE result_id = ?1 ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map(params![result_id.to_string()], |row| {
        Ok(bill_row_from_rusqlite(row))
    })?;

    let mut bills = Vec::new();
    for row in rows {
        bills.push(bill_from_row(row??)?);
    }
    Ok(bills)
}

pub fn update_bill(conn: &Connection, bill: &Bill) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE bills
         SET appointment_id = ?2, result_id = ?3, amount = ?4, insurance_coverage = ?5,
             currency = ?6, payment_date = ?7, payment_method = ?8, notes = ?9
         WHERE id = ?1",
        params![
            bill.id.to_string(),
            bill.appointment_id.map(|id| id.to_string()),
            bill.result_id.map(|id| id.to_string()),
            bill.amount,
            bill.insurance_coverage,
            bill.currency,
            bill.payment_date,
            bill.payment_method,
            bill.notes,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "bill".into(),
            id: bill.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_bill(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM bills WHERE id = ?1", params![id.to_string()])?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "bill".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Bill mapping.
// `currency` stays optional here; normalization to "USD" happens once in
// `bill_from_row`, the single ingestion point for bill rows.
struct BillRow {
    id: String,
    appointment_id: Option<String>,
    result_id: Option<String>,
    amount: f64,
    insurance_coverage: Option<f64>,
    currency: Option<String>,
    payment_date: Option<NaiveDateTime>,
    payment_method: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

fn bill_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<BillRow, rusqlite::Error> {
    Ok(BillRow {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        result_id: row.get(2)?,
        amount: row.get(3)?,
        insurance_coverage: row.get(4)?,
        currency: row.get(5)?,
        payment_date: row.get(6)?,
        payment_method: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn bill_from_row(row: BillRow) -> Result<Bill, DatabaseError> {
    Ok(Bill {
        id: parse_uuid("bills.id", &row.id)?,
        appointment_id: parse_optional_uuid("bills.appointment_id", row.appointment_id)?,
        result_id: parse_optional_uuid("bills.result_id", row.result_id)?,
        amount: row.amount,
        insurance_coverage: row.insurance_coverage,
        currency: normalize_currency(row.currency),
        payment_date: row.payment_date,
        payment_method: row.payment_method,
        notes: row.notes,
        created_at: row.created_at,
    })
}
