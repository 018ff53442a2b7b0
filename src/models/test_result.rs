use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A test result: lab work, imaging, cardio tests, etc. The `value` is kept
/// as free text — results range from a single number to a written report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub test_name: String,
    pub test_type: Option<String>,
    pub value: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
