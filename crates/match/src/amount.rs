use crate::config::ScoringConfig;
use crate::model::AmountSignal;

/// Compare two monetary amounts on magnitude. Bank feeds report debits
/// negative while invoices carry unsigned totals, so signs are ignored.
/// The difference is rounded to 3 decimals before the tolerance test to
/// absorb float representation noise; the tolerance models nothing else
/// (partial payment is out of scope).
pub fn compare_amounts(a: Option<f64>, b: Option<f64>, config: &ScoringConfig) -> AmountSignal {
    let (Some(a), Some(b)) = (a, b) else {
        return AmountSignal::Absent;
    };

    let difference = ((a.abs() - b.abs()).abs() * 1000.0).round() / 1000.0;
    if difference <= config.amount_tolerance {
        AmountSignal::Match
    } else {
        AmountSignal::Mismatch
    }
}
