use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a medication's intake schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTime {
    pub time: String,
    pub dosage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub strength: Option<f64>,
    pub unit: Option<String>,
    pub display_name: Option<String>,
    pub notes: Option<String>,
    pub frequency: String,
    pub schedule_times: Option<Vec<ScheduleTime>>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
