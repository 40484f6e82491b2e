use chrono::NaiveDate;

use crate::config::ScoringConfig;
use crate::model::DateSignal;

const CLOSE_DAYS: i64 = 3;
const RECENT_DAYS: i64 = 7;

/// Score transaction-date proximity to an attachment's candidate-date set.
///
/// A transaction inside the [earliest, latest] span of the candidate dates
/// gets the full contribution. Outside the span, the gap to the nearest
/// candidate decays through fixed tiers. Payment later than the latest
/// candidate date by more than the window is overdue, a hard reject; an
/// equally early payment merely contributes nothing on this axis.
pub fn score_date(
    transaction_date: Option<NaiveDate>,
    candidate_dates: &[NaiveDate],
    config: &ScoringConfig,
) -> DateSignal {
    let Some(date) = transaction_date else {
        return DateSignal::Absent;
    };
    let (Some(&earliest), Some(&latest)) =
        (candidate_dates.iter().min(), candidate_dates.iter().max())
    else {
        return DateSignal::Absent;
    };

    if earliest <= date && date <= latest {
        return DateSignal::Score(config.weights.date_exact);
    }

    if date > latest {
        let days_late = (date - latest).num_days();
        if days_late > config.date_window_days {
            return DateSignal::Overdue(days_late);
        }
        return DateSignal::Score(decay(days_late, config));
    }

    // Earlier than every candidate date: prepayment, never a hard reject.
    let days_early = (earliest - date).num_days();
    if days_early > config.date_window_days {
        return DateSignal::Score(0.0);
    }
    DateSignal::Score(decay(days_early, config))
}

/// Monotone decay of the day gap. 0 days recovers the full contribution.
fn decay(days: i64, config: &ScoringConfig) -> f64 {
    let weights = &config.weights;
    if days == 0 {
        weights.date_exact
    } else if days <= CLOSE_DAYS {
        weights.date_close
    } else if days <= RECENT_DAYS {
        weights.date_recent
    } else {
        weights.date_acceptable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn absent_when_either_side_missing() {
        assert_eq!(score_date(None, &[day(10)], &config()), DateSignal::Absent);
        assert_eq!(score_date(Some(day(10)), &[], &config()), DateSignal::Absent);
    }

    #[test]
    fn inside_candidate_span_scores_exact() {
        let dates = [day(10), day(25)];
        assert_eq!(
            score_date(Some(day(15)), &dates, &config()),
            DateSignal::Score(0.40)
        );
        assert_eq!(
            score_date(Some(day(10)), &dates, &config()),
            DateSignal::Score(0.40)
        );
        assert_eq!(
            score_date(Some(day(25)), &dates, &config()),
            DateSignal::Score(0.40)
        );
    }

    #[test]
    fn late_payment_decays_by_tier() {
        let dates = [day(1), day(10)];
        assert_eq!(score_date(Some(day(13)), &dates, &config()), DateSignal::Score(0.30));
        assert_eq!(score_date(Some(day(17)), &dates, &config()), DateSignal::Score(0.20));
        assert_eq!(score_date(Some(day(24)), &dates, &config()), DateSignal::Score(0.10));
    }

    #[test]
    fn overdue_beyond_window_hard_rejects() {
        let dates = [day(1), day(10)];
        assert_eq!(
            score_date(Some(day(25)), &dates, &config()),
            DateSignal::Overdue(15)
        );
    }

    #[test]
    fn window_boundary_still_scores() {
        let dates = [day(10)];
        assert_eq!(score_date(Some(day(24)), &dates, &config()), DateSignal::Score(0.10));
    }

    #[test]
    fn early_payment_decays_from_earliest_date() {
        let dates = [day(20), day(30)];
        assert_eq!(score_date(Some(day(18)), &dates, &config()), DateSignal::Score(0.30));
        assert_eq!(score_date(Some(day(14)), &dates, &config()), DateSignal::Score(0.20));
    }

    #[test]
    fn very_early_payment_contributes_nothing_but_is_not_rejected() {
        let dates = [day(20), day(30)];
        assert_eq!(score_date(Some(day(1)), &dates, &config()), DateSignal::Score(0.0));
    }

    #[test]
    fn single_candidate_date_works() {
        let dates = [day(10)];
        assert_eq!(score_date(Some(day(10)), &dates, &config()), DateSignal::Score(0.40));
        assert_eq!(score_date(Some(day(12)), &dates, &config()), DateSignal::Score(0.30));
    }
}
