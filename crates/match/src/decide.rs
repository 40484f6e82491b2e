use crate::amount::compare_amounts;
use crate::config::ScoringConfig;
use crate::date::score_date;
use crate::model::{
    AmountSignal, Attachment, DateSignal, Decision, NameSignal, RejectReason, Signals, Transaction,
};
use crate::name::score_names;

/// Build the three per-axis signals for one candidate pair.
pub fn classify_pair(
    transaction: &Transaction,
    attachment: &Attachment,
    config: &ScoringConfig,
) -> Signals {
    Signals {
        amount: compare_amounts(transaction.amount, attachment.amount, config),
        name: score_names(
            transaction.counterparty.as_deref(),
            attachment.counterparty.as_deref(),
            config,
        ),
        date: score_date(transaction.date, &attachment.dates, config),
    }
}

/// Apply the decision matrix to a signal set.
///
/// Order matters: hard filters first (amount mismatch, weak name, overdue
/// date), then the two-signal evidence requirement, then the additive
/// composite against the acceptance threshold. Every combination of the
/// three tagged outcomes lands in exactly one arm.
pub fn evaluate(signals: &Signals, config: &ScoringConfig) -> Decision {
    if signals.amount == AmountSignal::Mismatch {
        return Decision::Reject(RejectReason::AmountMismatch);
    }
    if let NameSignal::TooWeak(_) = signals.name {
        return Decision::Reject(RejectReason::NameTooWeak);
    }
    if let DateSignal::Overdue(_) = signals.date {
        return Decision::Reject(RejectReason::Overdue);
    }

    let mut present = 0;
    let mut composite = 0.0;

    if signals.amount == AmountSignal::Match {
        present += 1;
        composite += config.weights.amount;
    }
    if let NameSignal::Score(contribution) = signals.name {
        present += 1;
        composite += contribution;
    }
    if let DateSignal::Score(contribution) = signals.date {
        present += 1;
        composite += contribution;
    }

    // A single signal is insufficient evidence no matter how strong.
    if present < 2 {
        return Decision::Reject(RejectReason::InsufficientSignals);
    }

    if composite >= config.acceptance_threshold {
        Decision::Accept(composite)
    } else {
        Decision::Reject(RejectReason::BelowThreshold)
    }
}

/// Score one transaction/attachment pair end to end.
pub fn score_pair(
    transaction: &Transaction,
    attachment: &Attachment,
    config: &ScoringConfig,
) -> Decision {
    evaluate(&classify_pair(transaction, attachment, config), config)
}
