use chrono::NaiveDate;

use crate::config::{AttachmentSource, MatchConfig, TransactionSource};
use crate::error::MatchError;
use crate::model::{Attachment, AttachmentKind, MatchInput, Transaction};

/// Field extraction: raw CSV records → canonical entities. This is the
/// boundary where "record malformed" errors surface; inside the engine a
/// missing field is the absent signal, never an error.

pub fn load_input(
    config: &MatchConfig,
    transactions_csv: &str,
    attachments_csv: &str,
) -> Result<MatchInput, MatchError> {
    Ok(MatchInput {
        transactions: load_transactions(transactions_csv, &config.roles.transactions)?,
        attachments: load_attachments(attachments_csv, &config.roles.attachments)?,
    })
}

pub fn load_transactions(
    csv_data: &str,
    source: &TransactionSource,
) -> Result<Vec<Transaction>, MatchError> {
    const ROLE: &str = "transactions";

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let headers = read_headers(&mut reader)?;

    let columns = &source.columns;
    let record_id_idx = require(&headers, ROLE, &columns.record_id)?;
    let amount_idx = require(&headers, ROLE, &columns.amount)?;
    let date_idx = optional(&headers, ROLE, columns.date.as_deref())?;
    let reference_idx = optional(&headers, ROLE, columns.reference.as_deref())?;
    let counterparty_idx = optional(&headers, ROLE, columns.counterparty.as_deref())?;

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MatchError::Io(e.to_string()))?;
        let id = cell(&record, record_id_idx).unwrap_or_default();

        transactions.push(Transaction {
            amount: parse_amount(cell(&record, amount_idx), ROLE, &id)?,
            date: parse_date(date_idx.and_then(|i| cell(&record, i)), ROLE, &id)?,
            reference: reference_idx.and_then(|i| cell(&record, i)),
            counterparty: counterparty_idx.and_then(|i| cell(&record, i)),
            id,
        });
    }

    Ok(transactions)
}

pub fn load_attachments(
    csv_data: &str,
    source: &AttachmentSource,
) -> Result<Vec<Attachment>, MatchError> {
    const ROLE: &str = "attachments";

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let headers = read_headers(&mut reader)?;

    let columns = &source.columns;
    let record_id_idx = require(&headers, ROLE, &columns.record_id)?;
    let kind_idx = require(&headers, ROLE, &columns.kind)?;
    let amount_idx = require(&headers, ROLE, &columns.amount)?;
    let reference_idx = optional(&headers, ROLE, columns.reference.as_deref())?;
    let issuer_idx = optional(&headers, ROLE, columns.issuer.as_deref())?;
    let supplier_idx = optional(&headers, ROLE, columns.supplier.as_deref())?;
    let recipient_idx = optional(&headers, ROLE, columns.recipient.as_deref())?;

    // Every date-bearing column feeds the candidate-date set.
    let date_indices: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_lowercase().contains("date"))
        .map(|(i, _)| i)
        .collect();

    let mut attachments = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MatchError::Io(e.to_string()))?;
        let id = cell(&record, record_id_idx).unwrap_or_default();

        let kind = parse_kind(cell(&record, kind_idx), &id)?;

        let mut dates: Vec<NaiveDate> = Vec::new();
        for &i in &date_indices {
            if let Some(date) = parse_date(cell(&record, i), ROLE, &id)? {
                dates.push(date);
            }
        }

        // Role resolution: a purchase document names the other party as
        // issuer (or supplier on older templates); a sales document as
        // recipient.
        let counterparty = match kind {
            AttachmentKind::Purchase => issuer_idx
                .and_then(|i| cell(&record, i))
                .or_else(|| supplier_idx.and_then(|i| cell(&record, i))),
            AttachmentKind::Sales => recipient_idx.and_then(|i| cell(&record, i)),
        };

        attachments.push(Attachment {
            kind,
            amount: parse_amount(cell(&record, amount_idx), ROLE, &id)?,
            dates,
            reference: reference_idx.and_then(|i| cell(&record, i)),
            counterparty,
            id,
        });
    }

    Ok(attachments)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_headers<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, MatchError> {
    Ok(reader
        .headers()
        .map_err(|e| MatchError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect())
}

fn require(headers: &[String], role: &str, column: &str) -> Result<usize, MatchError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| MatchError::MissingColumn {
            role: role.into(),
            column: column.into(),
        })
}

/// A column that is mapped in config must exist; an unmapped column is
/// simply not extracted.
fn optional(
    headers: &[String],
    role: &str,
    column: Option<&str>,
) -> Result<Option<usize>, MatchError> {
    match column {
        Some(name) => require(headers, role, name).map(Some),
        None => Ok(None),
    }
}

/// Empty cells are absent, not errors.
fn cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    match record.get(index).map(str::trim) {
        Some("") | None => None,
        Some(value) => Some(value.to_string()),
    }
}

fn parse_amount(value: Option<String>, role: &str, id: &str) -> Result<Option<f64>, MatchError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| MatchError::AmountParse {
                role: role.into(),
                record_id: id.into(),
                value: raw,
            }),
    }
}

fn parse_date(value: Option<String>, role: &str, id: &str) -> Result<Option<NaiveDate>, MatchError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MatchError::DateParse {
                role: role.into(),
                record_id: id.into(),
                value: raw,
            }),
    }
}

fn parse_kind(value: Option<String>, id: &str) -> Result<AttachmentKind, MatchError> {
    let raw = value.unwrap_or_default();
    match raw.to_lowercase().as_str() {
        "purchase" => Ok(AttachmentKind::Purchase),
        "sales" => Ok(AttachmentKind::Sales),
        _ => Err(MatchError::UnknownKind {
            record_id: id.into(),
            value: raw,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
