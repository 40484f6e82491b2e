use crate::config::{MatchConfig, ScoringConfig};
use crate::decide::score_pair;
use crate::error::MatchError;
use crate::model::{
    Attachment, Decision, LinkOutcome, LinkRecord, MatchInput, MatchOutcome, MatchReport,
    ReportMeta, Transaction,
};
use crate::reference::normalize_reference;
use crate::summary::compute_summary;

/// Find the attachment a transaction settles, if any.
pub fn match_attachment_for<'a>(
    transaction: &Transaction,
    attachments: &'a [Attachment],
    config: &ScoringConfig,
) -> Option<(&'a Attachment, MatchOutcome)> {
    let pool: Vec<&Attachment> = attachments.iter().collect();
    best_match(
        transaction.reference.as_deref(),
        &pool,
        |a| a.reference.as_deref(),
        |a| score_pair(transaction, a, config),
    )
    .map(|(i, outcome)| (pool[i], outcome))
}

/// Find the transaction that settles an attachment, if any.
pub fn match_transaction_for<'a>(
    attachment: &Attachment,
    transactions: &'a [Transaction],
    config: &ScoringConfig,
) -> Option<(&'a Transaction, MatchOutcome)> {
    let pool: Vec<&Transaction> = transactions.iter().collect();
    best_match(
        attachment.reference.as_deref(),
        &pool,
        |t| t.reference.as_deref(),
        |t| score_pair(t, attachment, config),
    )
    .map(|(i, outcome)| (pool[i], outcome))
}

/// One selection routine for both directions, parameterized only by which
/// side is "self" and which supplies candidates. Reference matching runs
/// first and is never overridden by scoring. Candidates are visited in
/// input order; the first holder of an equal reference and the first of
/// equal best scores win, which pins tie-breaking to input order.
fn best_match<C>(
    self_reference: Option<&str>,
    candidates: &[&C],
    reference_of: impl Fn(&C) -> Option<&str>,
    score: impl Fn(&C) -> Decision,
) -> Option<(usize, MatchOutcome)> {
    if let Some(own) = normalize_reference(self_reference) {
        for (i, candidate) in candidates.iter().enumerate() {
            let candidate_reference = normalize_reference(reference_of(candidate));
            if candidate_reference.as_deref() == Some(own.as_str()) {
                return Some((i, MatchOutcome::Reference));
            }
        }
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        if let Decision::Accept(score_value) = score(candidate) {
            if best.map_or(true, |(_, held)| score_value > held) {
                best = Some((i, score_value));
            }
        }
    }

    best.map(|(i, score_value)| (i, MatchOutcome::Scored { score: score_value }))
}

/// Run the whole batch: link every transaction in input order, enforcing
/// the 1:1 invariant by withdrawing claimed attachments from later pools.
pub fn run(config: &MatchConfig, input: &MatchInput) -> Result<MatchReport, MatchError> {
    config.validate()?;

    let scoring = &config.scoring;
    let mut claimed = vec![false; input.attachments.len()];
    let mut links = Vec::with_capacity(input.transactions.len());

    for transaction in &input.transactions {
        let pool: Vec<(usize, &Attachment)> = input
            .attachments
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .collect();
        let candidates: Vec<&Attachment> = pool.iter().map(|(_, a)| *a).collect();

        let found = best_match(
            transaction.reference.as_deref(),
            &candidates,
            |a| a.reference.as_deref(),
            |a| score_pair(transaction, a, scoring),
        );

        match found {
            Some((pool_index, outcome)) => {
                let (attachment_index, attachment) = pool[pool_index];
                claimed[attachment_index] = true;
                let (link_outcome, score) = match outcome {
                    MatchOutcome::Reference => (LinkOutcome::Reference, None),
                    MatchOutcome::Scored { score } => (LinkOutcome::Scored, Some(score)),
                };
                links.push(LinkRecord {
                    transaction_id: transaction.id.clone(),
                    attachment_id: Some(attachment.id.clone()),
                    outcome: link_outcome,
                    score,
                });
            }
            None => links.push(LinkRecord {
                transaction_id: transaction.id.clone(),
                attachment_id: None,
                outcome: LinkOutcome::Unmatched,
                score: None,
            }),
        }
    }

    let summary = compute_summary(&links);

    Ok(MatchReport {
        meta: ReportMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttachmentKind;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn transaction(id: &str, amount: f64, date: u32) -> Transaction {
        Transaction {
            id: id.into(),
            amount: Some(amount),
            date: Some(day(date)),
            reference: None,
            counterparty: None,
        }
    }

    fn attachment(id: &str, amount: f64, dates: &[u32]) -> Attachment {
        Attachment {
            id: id.into(),
            kind: AttachmentKind::Purchase,
            amount: Some(amount),
            dates: dates.iter().map(|&d| day(d)).collect(),
            reference: None,
            counterparty: None,
        }
    }

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn reference_match_bypasses_scoring() {
        let mut tx = transaction("t1", 999.0, 1);
        tx.reference = Some("00123".into());
        // Wildly different amount and date; reference still wins.
        let mut att = attachment("a1", 5.0, &[28]);
        att.reference = Some("123".into());

        let atts = [att];
        let (found, outcome) = match_attachment_for(&tx, &atts, &config()).unwrap();
        assert_eq!(found.id, "a1");
        assert_eq!(outcome, MatchOutcome::Reference);
    }

    #[test]
    fn duplicate_references_resolve_to_first_in_input_order() {
        let mut tx = transaction("t1", 100.0, 10);
        tx.reference = Some("42".into());
        let mut first = attachment("a1", 100.0, &[10]);
        first.reference = Some("042".into());
        let mut second = attachment("a2", 100.0, &[10]);
        second.reference = Some("42".into());

        let atts = [first, second];
        let (found, _) = match_attachment_for(&tx, &atts, &config()).unwrap();
        assert_eq!(found.id, "a1");
    }

    #[test]
    fn amount_and_date_accept_without_name() {
        let tx = transaction("t1", 250.0, 10);
        let att = attachment("a1", 250.0, &[6, 14]);

        let atts = [att];
        let (found, outcome) = match_attachment_for(&tx, &atts, &config()).unwrap();
        assert_eq!(found.id, "a1");
        match outcome {
            MatchOutcome::Scored { score } => assert!((score - 0.75).abs() < 1e-9),
            other => panic!("expected scored outcome, got {other:?}"),
        }
    }

    #[test]
    fn best_scoring_candidate_wins() {
        let tx = transaction("t1", 250.0, 10);
        // Both accepted (0.65 vs 0.75); the closer dates win.
        let far = attachment("a1", 250.0, &[7]);
        let near = attachment("a2", 250.0, &[8, 12]);

        let atts = [far, near];
        let (found, _) = match_attachment_for(&tx, &atts, &config()).unwrap();
        assert_eq!(found.id, "a2");
    }

    #[test]
    fn equal_scores_resolve_to_first_in_input_order() {
        let tx = transaction("t1", 250.0, 10);
        let first = attachment("a1", 250.0, &[10]);
        let second = attachment("a2", 250.0, &[10]);

        let atts = [first, second];
        let (found, _) = match_attachment_for(&tx, &atts, &config()).unwrap();
        assert_eq!(found.id, "a1");
    }

    #[test]
    fn no_acceptable_candidate_returns_none() {
        let tx = transaction("t1", 250.0, 10);
        let att = attachment("a1", 300.0, &[10]);
        assert!(match_attachment_for(&tx, &[att], &config()).is_none());
    }

    #[test]
    fn both_directions_agree() {
        let tx = transaction("t1", 250.0, 10);
        let att = attachment("a1", 250.0, &[6, 14]);

        let forward = match_attachment_for(&tx, std::slice::from_ref(&att), &config());
        let backward = match_transaction_for(&att, std::slice::from_ref(&tx), &config());

        assert_eq!(forward.unwrap().0.id, "a1");
        assert_eq!(backward.unwrap().0.id, "t1");
    }

    #[test]
    fn run_is_deterministic() {
        let config = MatchConfig::from_toml(TEST_CONFIG).unwrap();
        let input = MatchInput {
            transactions: vec![transaction("t1", 250.0, 10), transaction("t2", 90.0, 12)],
            attachments: vec![attachment("a1", 250.0, &[9, 11]), attachment("a2", 90.0, &[12])],
        };

        let first = run(&config, &input).unwrap();
        let second = run(&config, &input).unwrap();
        assert_eq!(first.links, second.links);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn run_enforces_one_to_one() {
        let config = MatchConfig::from_toml(TEST_CONFIG).unwrap();
        // Two transactions that would both accept the single attachment.
        let input = MatchInput {
            transactions: vec![transaction("t1", 250.0, 10), transaction("t2", 250.0, 10)],
            attachments: vec![attachment("a1", 250.0, &[10])],
        };

        let report = run(&config, &input).unwrap();
        assert_eq!(report.links[0].attachment_id.as_deref(), Some("a1"));
        assert_eq!(report.links[1].outcome, LinkOutcome::Unmatched);
        assert_eq!(report.summary.scored_matched, 1);
        assert_eq!(report.summary.unmatched, 1);
    }

    const TEST_CONFIG: &str = r#"
name = "engine tests"

[roles.transactions]
file = "bank.csv"
[roles.transactions.columns]
record_id = "id"
amount    = "amount"

[roles.attachments]
file = "invoices.csv"
[roles.attachments.columns]
record_id = "id"
kind      = "kind"
amount    = "amount"
"#;
}
