//! Unified timeline — one chronological feed across appointments, test
//! results, and bills.

use std::collections::HashMap;

use uuid::Uuid;

use super::types::{TimelineEvent, TimelineRecord};
use crate::models::{Appointment, Bill, TestResult};

/// Build the unified timeline, most recent first.
///
/// Effective dates per entity:
/// - appointment: its own date
/// - result: the linked appointment's date, else its own created_at
/// - bill: payment_date, else the linked appointment's date, else created_at
///
/// The sort is stable and keyed on the effective date alone, so same-date
/// events keep their insertion order (appointments, then results, then bills).
pub fn build_timeline_events(
    appointments: &[Appointment],
    results: &[TestResult],
    bills: &[Bill],
) -> Vec<TimelineEvent> {
    let appointment_index: HashMap<Uuid, &Appointment> =
        appointments.iter().map(|a| (a.id, a)).collect();

    let mut events: Vec<TimelineEvent> = Vec::with_capacity(
        appointments.len() + results.len() + bills.len(),
    );

    for appointment in appointments {
        events.push(TimelineEvent {
            id: appointment.id,
            date: appointment.date,
            record: TimelineRecord::Appointment {
                appointment: appointment.clone(),
            },
        });
    }

    for result in results {
        let date = result
            .appointment_id
            .and_then(|id| appointment_index.get(&id))
            .map(|a| a.date)
            .unwrap_or(result.created_at);
        events.push(TimelineEvent {
            id: result.id,
            date,
            record: TimelineRecord::Result {
                result: result.clone(),
            },
        });
    }

    for bill in bills {
        let date = bill.payment_date.unwrap_or_else(|| {
            bill.appointment_id
                .and_then(|id| appointment_index.get(&id))
                .map(|a| a.date)
                .unwrap_or(bill.created_at)
        });
        events.push(TimelineEvent {
            id: bill.id,
            date,
            record: TimelineRecord::Bill { bill: bill.clone() },
        });
    }

    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}
