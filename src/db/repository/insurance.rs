use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::dashboard::normalize_currency;
use crate::db::DatabaseError;
use crate::models::InsurancePolicy;

const COLUMNS: &str = "id, provider_name, policy_id, insurance_type, price, currency,
     coverage_data, created_at, updated_at";

pub fn insert_insurance(conn: &Connection, policy: &InsurancePolicy) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO insurances (id, provider_name, policy_id, insurance_type, price, currency,
         coverage_data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            policy.id.to_string(),
            policy.provider_name,
            policy.policy_id,
            policy.insurance_type,
            policy.price,
            policy.currency,
            coverage_to_json(&policy.coverage_data)?,
            policy.created_at,
            policy.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_insurance(conn: &Connection, id: &Uuid) -> Result<InsurancePolicy, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM insurances WHERE id = ?1"))?;

    let mut rows = stmt.query_map(params![id.to_string()], |row| {
        Ok(insurance_row_from_rusqlite(row))
    })?;

    match rows.next() {
        Some(row) => insurance_from_row(row??),
        None => Err(DatabaseError::NotFound {
            entity_type: "insurance".into(),
            id: id.to_string(),
        }),
    }
}

/// All insurance policies, newest first.
pub fn list_insurances(conn: &Connection) -> Result<Vec<InsurancePolicy>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM insurances ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(insurance_row_from_rusqlite(row)))?;

    let mut policies = Vec::new();
    for row in rows {
        policies.push(insurance_from_row(row??)?);
    }
    Ok(policies)
}

pub fn update_insurance(conn: &Connection, policy: &InsurancePolicy) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE insurances
         SET provider_name = ?2, policy_id = ?3, insurance_type = ?4, price = ?5, currency = ?6,
             coverage_data = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            policy.id.to_string(),
            policy.provider_name,
            policy.policy_id,
            policy.insurance_type,
            policy.price,
            policy.currency,
            coverage_to_json(&policy.coverage_data)?,
            policy.updated_at,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "insurance".into(),
            id: policy.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_insurance(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM insurances WHERE id = ?1",
        params![id.to_string()],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "insurance".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn coverage_to_json(data: &Option<serde_json::Value>) -> Result<Option<String>, DatabaseError> {
    data.as_ref()
        .map(|v| {
            serde_json::to_string(v).map_err(|e| DatabaseError::InvalidJson {
                column: "insurances.coverage_data".into(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn coverage_from_json(raw: Option<String>) -> Result<Option<serde_json::Value>, DatabaseError> {
    raw.map(|s| {
        serde_json::from_str(&s).map_err(|e| DatabaseError::InvalidJson {
            column: "insurances.coverage_data".into(),
            reason: e.to_string(),
        })
    })
    .transpose()
}

// Internal row type for InsurancePolicy mapping
struct InsuranceRow {
    id: String,
    provider_name: String,
    policy_id: Option<String>,
    insurance_type: Option<String>,
    price: Option<f64>,
    currency: Option<String>,
    coverage_data: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn insurance_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<InsuranceRow, rusqlite::Error> {
    Ok(InsuranceRow {
        id: row.get(0)?,
        provider_name: row.get(1)?,
        policy_id: row.get(2)?,
        insurance_type: row.get(3)?,
        price: row.get(4)?,
        currency: row.get(5)?,
        coverage_data: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn insurance_from_row(row: InsuranceRow) -> Result<InsurancePolicy, DatabaseError> {
    Ok(InsurancePolicy {
        id: parse_uuid("insurances.id", &row.id)?,
        provider_name: row.provider_name,
        policy_id: row.policy_id,
        insurance_type: row.insurance_type,
        price: row.price,
        currency: normalize_currency(row.currency),
        coverage_data: coverage_from_json(row.coverage_data)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
