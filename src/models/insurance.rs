use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An insurance policy. `coverage_data` holds whatever loosely-typed JSON
/// the external document-extraction service produced — stored opaquely,
/// never interpreted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub id: Uuid,
    pub provider_name: String,
    pub policy_id: Option<String>,
    pub insurance_type: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub coverage_data: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
