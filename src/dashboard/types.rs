use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Appointment, Bill, TestResult};

/// Spend and coverage accumulated for one bill category.
///
/// `user_paid` is a straight subtraction: when a malformed bill carries
/// coverage above its amount, the negative artifact is shown as-is rather
/// than clamped. Input validation belongs to the entry forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total_amount: f64,
    pub insurance_coverage: f64,
    pub user_paid: f64,
    pub coverage_percentage: f64,
}

/// Paid-bill totals for the current calendar windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotalCosts {
    pub this_month: f64,
    pub this_year: f64,
    /// Per-currency totals, this-year scope only.
    pub by_currency: BTreeMap<String, f64>,
}

/// A bill enriched with its resolved relations for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillWithRelations {
    #[serde(flatten)]
    pub bill: Bill,
    pub related_appointment: Option<Appointment>,
    pub related_result: Option<TestResult>,
}

/// Aggregate snapshot for the dashboard — single fetch for all content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_appointments: u32,
    pub upcoming_appointments: Vec<Appointment>,
    pub recent_results: Vec<TestResult>,
    pub total_costs: TotalCosts,
    pub recent_bills: Vec<BillWithRelations>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub primary_currency: String,
}

/// The record behind a timeline event, tagged with its entity type. The
/// source record is nested under its type name so the serialized event reads
/// `{id, date, type: "appointment", appointment: {..}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineRecord {
    Appointment { appointment: Appointment },
    Result { result: TestResult },
    Bill { bill: Bill },
}

/// A single event on the unified timeline. `date` is the effective date
/// used for ordering, derived per entity type (see `build_timeline_events`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: Uuid,
    pub date: NaiveDateTime,
    #[serde(flatten)]
    pub record: TimelineRecord,
}
