//! Dashboard statistics — the aggregate snapshot behind the home screen.
//!
//! Pure computation over already-materialized collections; `now` is injected
//! so the calendar windows are deterministic under test. The "recent" slices
//! rely on the store's newest-first list contracts and are not re-sorted.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use super::breakdown::category_breakdown;
use super::currency::primary_currency;
use super::types::{BillWithRelations, DashboardStats, TotalCosts};
use crate::models::{Appointment, Bill, TestResult};

/// How many entries the upcoming/recent dashboard slices carry.
const RECENT_LIMIT: usize = 5;

fn start_of_month(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .with_day(1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(now)
}

fn start_of_year(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(now)
}

/// Assemble the full dashboard snapshot from the three collections.
pub fn build_dashboard_stats(
    appointments: &[Appointment],
    results: &[TestResult],
    bills: &[Bill],
    now: NaiveDateTime,
) -> DashboardStats {
    let month_start = start_of_month(now);
    let year_start = start_of_year(now);

    // Upcoming: strictly after `now`, soonest first, capped.
    let mut upcoming_appointments: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.date > now)
        .cloned()
        .collect();
    upcoming_appointments.sort_by(|a, b| a.date.cmp(&b.date));
    upcoming_appointments.truncate(RECENT_LIMIT);

    let recent_results: Vec<TestResult> = results.iter().take(RECENT_LIMIT).cloned().collect();

    // Cost windows count paid bills only; a bill with no payment_date is
    // excluded from both totals no matter when it was created.
    let this_month: f64 = bills
        .iter()
        .filter(|b| b.payment_date.is_some_and(|p| p >= month_start))
        .map(|b| b.amount)
        .sum();

    let this_year_bills: Vec<&Bill> = bills
        .iter()
        .filter(|b| b.payment_date.is_some_and(|p| p >= year_start))
        .collect();
    let this_year: f64 = this_year_bills.iter().map(|b| b.amount).sum();

    let mut by_currency = std::collections::BTreeMap::new();
    for bill in &this_year_bills {
        *by_currency.entry(bill.currency.clone()).or_insert(0.0) += bill.amount;
    }

    // Lookup-only enrichment of the newest bills — no extra fetches.
    let appointment_index: HashMap<Uuid, &Appointment> =
        appointments.iter().map(|a| (a.id, a)).collect();
    let result_index: HashMap<Uuid, &TestResult> = results.iter().map(|r| (r.id, r)).collect();

    let recent_bills: Vec<BillWithRelations> = bills
        .iter()
        .take(RECENT_LIMIT)
        .map(|bill| BillWithRelations {
            bill: bill.clone(),
            related_appointment: bill
                .appointment_id
                .and_then(|id| appointment_index.get(&id))
                .map(|a| (*a).clone()),
            related_result: bill
                .result_id
                .and_then(|id| result_index.get(&id))
                .map(|r| (*r).clone()),
        })
        .collect();

    DashboardStats {
        total_appointments: appointments.len() as u32,
        upcoming_appointments,
        recent_results,
        total_costs: TotalCosts {
            this_month,
            this_year,
            by_currency,
        },
        recent_bills,
        category_breakdown: category_breakdown(bills, appointments, results),
        primary_currency: primary_currency(bills),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn appointment(date: NaiveDateTime) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            date,
            doctor_name: "Dr. Rojas".into(),
            specialty: Some("Cardiology".into()),
            medical_center: None,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn test_result(created: NaiveDateTime) -> TestResult {
        TestResult {
            id: Uuid::new_v4(),
            appointment_id: None,
            test_name: "CBC".into(),
            test_type: None,
            value: None,
            unit: None,
            reference_range: None,
            notes: None,
            created_at: created,
        }
    }

    fn paid_bill(amount: f64, currency: &str, paid: NaiveDateTime) -> Bill {
        Bill {
            id: Uuid::new_v4(),
            appointment_id: None,
            result_id: None,
            amount,
            insurance_coverage: None,
            currency: currency.into(),
            payment_date: Some(paid),
            payment_method: None,
            notes: None,
            created_at: paid,
        }
    }

    fn unpaid_bill(amount: f64, created: NaiveDateTime) -> Bill {
        Bill {
            payment_date: None,
            ..paid_bill(amount, "USD", created)
        }
    }

    const NOW: &str = "2025-06-15T12:00:00";

    #[test]
    fn upcoming_is_strictly_after_now() {
        let now = datetime(NOW);
        let at_now = appointment(now);
        let one_second_later = appointment(now + Duration::seconds(1));
        let past = appointment(now - Duration::days(3));

        let stats =
            build_dashboard_stats(&[at_now, one_second_later.clone(), past], &[], &[], now);

        assert_eq!(stats.upcoming_appointments.len(), 1);
        assert_eq!(stats.upcoming_appointments[0].id, one_second_later.id);
    }

    #[test]
    fn upcoming_sorted_ascending_and_capped_at_five() {
        let now = datetime(NOW);
        let appointments: Vec<Appointment> = (1..=7)
            .rev()
            .map(|d| appointment(now + Duration::days(d)))
            .collect();

        let stats = build_dashboard_stats(&appointments, &[], &[], now);

        assert_eq!(stats.upcoming_appointments.len(), 5);
        let dates: Vec<_> = stats.upcoming_appointments.iter().map(|a| a.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates[0], now + Duration::days(1));
    }

    #[test]
    fn total_appointments_counts_all() {
        let now = datetime(NOW);
        let appointments = vec![
            appointment(now - Duration::days(10)),
            appointment(now + Duration::days(10)),
        ];
        let stats = build_dashboard_stats(&appointments, &[], &[], now);
        assert_eq!(stats.total_appointments, 2);
    }

    #[test]
    fn recent_results_keeps_store_order_and_caps() {
        let now = datetime(NOW);
        let results: Vec<TestResult> = (0..7)
            .map(|d| test_result(now - Duration::days(d)))
            .collect();

        let stats = build_dashboard_stats(&[], &results, &[], now);

        assert_eq!(stats.recent_results.len(), 5);
        // Not re-sorted: first five of the input, in input order
        for (got, expected) in stats.recent_results.iter().zip(&results) {
            assert_eq!(got.id, expected.id);
        }
    }

    #[test]
    fn month_and_year_windows() {
        let now = datetime(NOW);
        let bills = vec![
            paid_bill(100.0, "USD", datetime("2025-06-02T09:00:00")), // this month
            paid_bill(40.0, "USD", datetime("2025-03-10T09:00:00")),  // this year only
            paid_bill(7.0, "USD", datetime("2024-12-31T23:59:59")),   // last year
        ];

        let stats = build_dashboard_stats(&[], &[], &bills, now);
        assert_eq!(stats.total_costs.this_month, 100.0);
        assert_eq!(stats.total_costs.this_year, 140.0);
    }

    #[test]
    fn unpaid_bills_excluded_from_totals() {
        let now = datetime(NOW);
        let bills = vec![
            unpaid_bill(500.0, datetime("2025-06-10T09:00:00")),
            paid_bill(20.0, "USD", datetime("2025-06-11T09:00:00")),
        ];

        let stats = build_dashboard_stats(&[], &[], &bills, now);
        assert_eq!(stats.total_costs.this_month, 20.0);
        assert_eq!(stats.total_costs.this_year, 20.0);
    }

    #[test]
    fn by_currency_is_year_scoped() {
        let now = datetime(NOW);
        let bills = vec![
            paid_bill(100.0, "USD", datetime("2025-02-01T09:00:00")),
            paid_bill(30000.0, "CLP", datetime("2025-04-01T09:00:00")),
            paid_bill(55.0, "USD", datetime("2024-08-01T09:00:00")), // out of window
        ];

        let stats = build_dashboard_stats(&[], &[], &bills, now);
        assert_eq!(stats.total_costs.by_currency.get("USD"), Some(&100.0));
        assert_eq!(stats.total_costs.by_currency.get("CLP"), Some(&30000.0));
    }

    #[test]
    fn recent_bills_enriched_with_relations() {
        let now = datetime(NOW);
        let appt = appointment(now - Duration::days(5));
        let res = test_result(now - Duration::days(4));

        let mut linked = paid_bill(80.0, "USD", now - Duration::days(3));
        linked.appointment_id = Some(appt.id);
        linked.result_id = Some(res.id);

        let mut dangling = paid_bill(10.0, "USD", now - Duration::days(2));
        dangling.appointment_id = Some(Uuid::new_v4()); // unresolvable

        let stats = build_dashboard_stats(
            std::slice::from_ref(&appt),
            std::slice::from_ref(&res),
            &[linked.clone(), dangling.clone()],
            now,
        );

        assert_eq!(stats.recent_bills.len(), 2);
        let enriched = stats
            .recent_bills
            .iter()
            .find(|b| b.bill.id == linked.id)
            .unwrap();
        assert_eq!(enriched.related_appointment.as_ref().unwrap().id, appt.id);
        assert_eq!(enriched.related_result.as_ref().unwrap().id, res.id);

        let broken = stats
            .recent_bills
            .iter()
            .find(|b| b.bill.id == dangling.id)
            .unwrap();
        assert!(broken.related_appointment.is_none());
        assert!(broken.related_result.is_none());
    }

    #[test]
    fn primary_currency_uses_full_collection() {
        let now = datetime(NOW);
        // CLP dominates overall even though only USD bills are in-window
        let bills = vec![
            paid_bill(10.0, "USD", datetime("2025-06-01T09:00:00")),
            paid_bill(1000.0, "CLP", datetime("2023-01-01T09:00:00")),
            paid_bill(1000.0, "CLP", datetime("2023-02-01T09:00:00")),
        ];

        let stats = build_dashboard_stats(&[], &[], &bills, now);
        assert_eq!(stats.primary_currency, "CLP");
    }
}
