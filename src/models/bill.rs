use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medical bill, optionally linked to the appointment or test result it
/// paid for. `currency` is always populated — rows with no stored currency
/// are normalized to "USD" when read (see `dashboard::normalize_currency`).
///
/// `insurance_coverage` is what the insurer paid, by convention at most
/// `amount`. The convention is not enforced here; form validation owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub result_id: Option<Uuid>,
    pub amount: f64,
    pub insurance_coverage: Option<f64>,
    pub currency: String,
    pub payment_date: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
