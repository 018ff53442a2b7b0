//! Currency rules shared by the aggregation views.
//!
//! The normalization rule (no currency → "USD") used to be re-derived ad hoc
//! wherever currency was read; it lives here once, applied at the row-mapping
//! boundary so the engine only ever sees populated currency codes.

use crate::models::Bill;

/// Currency assumed for records that carry none.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Collapse an absent or empty stored currency to the default code.
pub fn normalize_currency(raw: Option<String>) -> String {
    match raw {
        Some(code) if !code.is_empty() => code,
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

/// The currency code occurring most frequently among the bills.
///
/// Ties keep the first-encountered code: the winner is only replaced on a
/// strictly greater count. Empty input defaults to "USD".
pub fn primary_currency(bills: &[Bill]) -> String {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for bill in bills {
        match counts.iter_mut().find(|(code, _)| *code == bill.currency) {
            Some((_, count)) => *count += 1,
            None => counts.push((bill.currency.as_str(), 1)),
        }
    }

    let mut primary = DEFAULT_CURRENCY;
    let mut max_count = 0;
    for (code, count) in counts {
        if count > max_count {
            max_count = count;
            primary = code;
        }
    }
    primary.to_string()
}
