use std::collections::HashMap;

use crate::model::{LinkOutcome, LinkRecord, MatchSummary};

/// Compute summary statistics from the per-transaction link records.
pub fn compute_summary(links: &[LinkRecord]) -> MatchSummary {
    let mut outcome_counts: HashMap<String, usize> = HashMap::new();
    let mut reference_matched = 0;
    let mut scored_matched = 0;
    let mut unmatched = 0;

    for link in links {
        *outcome_counts.entry(link.outcome.to_string()).or_insert(0) += 1;

        match link.outcome {
            LinkOutcome::Reference => reference_matched += 1,
            LinkOutcome::Scored => scored_matched += 1,
            LinkOutcome::Unmatched => unmatched += 1,
        }
    }

    MatchSummary {
        total_transactions: links.len(),
        reference_matched,
        scored_matched,
        unmatched,
        outcome_counts,
    }
}
