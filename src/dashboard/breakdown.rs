//! Category cost breakdown — groups bills by derived category and computes
//! out-of-pocket and coverage figures per group.

use std::collections::HashMap;

use uuid::Uuid;

use super::currency::primary_currency;
use super::types::CategoryBreakdown;
use crate::models::{Appointment, Bill, TestResult};

/// Derive the category label for a bill, given its resolved relations.
///
/// Priority: appointment specialty, then the generic "Appointment", then
/// result test type, then the generic "Test", then "Other". Total — every
/// bill maps to exactly one label.
pub fn bill_category(
    bill: &Bill,
    appointment: Option<&Appointment>,
    result: Option<&TestResult>,
) -> String {
    if bill.appointment_id.is_some() {
        if let Some(specialty) = appointment.and_then(|a| a.specialty.as_deref()) {
            return specialty.to_string();
        }
        return "Appointment".to_string();
    }
    if bill.result_id.is_some() {
        if let Some(test_type) = result.and_then(|r| r.test_type.as_deref()) {
            return test_type.to_string();
        }
        return "Test".to_string();
    }
    "Other".to_string()
}

struct CategoryTotals {
    category: String,
    total_amount: f64,
    insurance_coverage: f64,
}

/// Build the per-category cost breakdown over the primary-currency bills.
///
/// Bills in any other currency are dropped from this view entirely — the
/// breakdown is a single-currency picture, not a converted one. Sorted
/// descending by out-of-pocket spend; ties keep category first-seen order.
pub fn category_breakdown(
    bills: &[Bill],
    appointments: &[Appointment],
    results: &[TestResult],
) -> Vec<CategoryBreakdown> {
    let primary = primary_currency(bills);

    let appointment_index: HashMap<Uuid, &Appointment> =
        appointments.iter().map(|a| (a.id, a)).collect();
    let result_index: HashMap<Uuid, &TestResult> = results.iter().map(|r| (r.id, r)).collect();

    // Vec keeps category first-seen order for the stable tie-break below.
    let mut totals: Vec<CategoryTotals> = Vec::new();

    for bill in bills {
        if bill.currency != primary {
            continue;
        }

        let appointment = bill
            .appointment_id
            .and_then(|id| appointment_index.get(&id).copied());
        let result = bill.result_id.and_then(|id| result_index.get(&id).copied());

        let category = bill_category(bill, appointment, result);
        let coverage = bill.insurance_coverage.unwrap_or(0.0);

        match totals.iter_mut().find(|t| t.category == category) {
            Some(entry) => {
                entry.total_amount += bill.amount;
                entry.insurance_coverage += coverage;
            }
            None => totals.push(CategoryTotals {
                category,
                total_amount: bill.amount,
                insurance_coverage: coverage,
            }),
        }
    }

    let mut breakdown: Vec<CategoryBreakdown> = totals
        .into_iter()
        .map(|t| {
            let user_paid = t.total_amount - t.insurance_coverage;
            let coverage_percentage = if t.total_amount > 0.0 {
                (t.insurance_coverage / t.total_amount) * 100.0
            } else {
                0.0
            };
            CategoryBreakdown {
                category: t.category,
                total_amount: t.total_amount,
                insurance_coverage: t.insurance_coverage,
                user_paid,
                coverage_percentage,
            }
        })
        .collect();

    // Stable sort: equal user_paid preserves first-seen order.
    breakdown.sort_by(|a, b| {
        b.user_paid
            .partial_cmp(&a.user_paid)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    breakdown
}
