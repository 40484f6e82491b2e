//! `ledgerlink-match` — bank transaction ↔ invoice attachment matching.
//!
//! Pure engine crate: receives pre-extracted records, returns link results.
//! No I/O inside the matching path; scoring is a function of the two
//! entities and the configuration, nothing else.

pub mod amount;
pub mod config;
pub mod date;
pub mod decide;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod name;
pub mod reference;
pub mod summary;

pub use config::{MatchConfig, ScoringConfig};
pub use engine::{match_attachment_for, match_transaction_for, run};
pub use error::MatchError;
pub use extract::load_input;
pub use model::{Attachment, MatchInput, MatchReport, Transaction};
