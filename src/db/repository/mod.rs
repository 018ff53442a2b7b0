//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per entity table.
//! UUIDs are stored as text and parsed back on read; timestamps go through
//! rusqlite's chrono support.

mod appointment;
mod bill;
mod insurance;
mod medication;
mod test_result;

pub use appointment::*;
pub use bill::*;
pub use insurance::*;
pub use medication::*;
pub use test_result::*;

use uuid::Uuid;

use super::DatabaseError;

pub(crate) fn parse_uuid(column: &str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| {
        DatabaseError::ConstraintViolation(format!("{column} is not a UUID ({raw}): {e}"))
    })
}

pub(crate) fn parse_optional_uuid(
    column: &str,
    raw: Option<String>,
) -> Result<Option<Uuid>, DatabaseError> {
    raw.map(|s| parse_uuid(column, &s)).transpose()
}
