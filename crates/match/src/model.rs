use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input entities
// ---------------------------------------------------------------------------

/// A bank transaction, already extracted into canonical shape.
/// Bank feeds rarely carry a clean counterparty name, so it is optional.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: String,
    /// Signed amount as reported by the bank (debits negative).
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub reference: Option<String>,
    pub counterparty: Option<String>,
}

/// Whether an attachment documents a purchase or a sale. Decides which
/// role field (issuer/supplier vs recipient) supplies the counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Purchase,
    Sales,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Purchase => write!(f, "purchase"),
            Self::Sales => write!(f, "sales"),
        }
    }
}

/// A document attachment (invoice, receipt) extracted into canonical shape.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: String,
    pub kind: AttachmentKind,
    pub amount: Option<f64>,
    /// Candidate-date set: every date-bearing source field (due date,
    /// invoicing date, ...). Any one of them may satisfy the date signal.
    pub dates: Vec<NaiveDate>,
    pub reference: Option<String>,
    pub counterparty: Option<String>,
}

/// Pre-extracted records for one batch run.
pub struct MatchInput {
    pub transactions: Vec<Transaction>,
    pub attachments: Vec<Attachment>,
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Amount axis outcome. Mismatch is a global hard filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountSignal {
    Match,
    Mismatch,
    Absent,
}

/// Name axis outcome. The carried value is the weighted contribution;
/// `TooWeak` is a hard filter (contribution under the configured floor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NameSignal {
    Score(f64),
    TooWeak(f64),
    Absent,
}

/// Date axis outcome. `Overdue` carries the days past the latest candidate
/// date and is a hard filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateSignal {
    Score(f64),
    Overdue(i64),
    Absent,
}

/// The three per-axis outcomes for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub amount: AmountSignal,
    pub name: NameSignal,
    pub date: DateSignal,
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AmountMismatch,
    NameTooWeak,
    Overdue,
    InsufficientSignals,
    BelowThreshold,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmountMismatch => write!(f, "amount_mismatch"),
            Self::NameTooWeak => write!(f, "name_too_weak"),
            Self::Overdue => write!(f, "overdue"),
            Self::InsufficientSignals => write!(f, "insufficient_signals"),
            Self::BelowThreshold => write!(f, "below_threshold"),
        }
    }
}

/// Decision engine verdict for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Accept(f64),
    Reject(RejectReason),
}

/// How an accepted link was established.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// Normalized references were equal; scoring bypassed.
    Reference,
    /// Accepted on the composite score.
    Scored { score: f64 },
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Reference,
    Scored,
    Unmatched,
}

impl std::fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Scored => write!(f, "scored"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// One transaction's result in the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
    pub outcome: LinkOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total_transactions: usize,
    pub reference_matched: usize,
    pub scored_matched: usize,
    pub unmatched: usize,
    pub outcome_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub meta: ReportMeta,
    pub summary: MatchSummary,
    pub links: Vec<LinkRecord>,
}
