use serde::Deserialize;

use crate::error::MatchError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub roles: RolesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Everything the scorers and the decision engine depend on. Passed by
/// reference into every scorer call; no ambient state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// The reconciling company's own name. Its tokens never participate
    /// in name scoring.
    pub self_name: Option<String>,
    /// Legal-entity suffix tokens dropped during name normalization.
    pub suffixes: Vec<String>,
    /// Absolute amount tolerance, absorbs float representation noise only.
    pub amount_tolerance: f64,
    /// Composite score required to accept a scored candidate.
    pub acceptance_threshold: f64,
    /// Name contributions under this floor are a hard reject.
    pub name_floor: f64,
    /// Days past the latest candidate date before a hard reject.
    pub date_window_days: i64,
    pub weights: Weights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            self_name: None,
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            amount_tolerance: 0.01,
            acceptance_threshold: 0.60,
            name_floor: 0.20,
            date_window_days: 14,
            weights: Weights::default(),
        }
    }
}

const DEFAULT_SUFFIXES: &[&str] = &[
    "oy", "ab", "oyj", "tmi", "ltd", "llc", "inc", "corp", "gmbh", "sa",
    "sas", "as", "bv", "nv", "ag", "spa",
];

/// Per-signal score contributions. Calibrated so the maximum composite is
/// 1.15 and no single signal can reach the acceptance threshold alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub amount: f64,
    pub name_exact: f64,
    pub name_good: f64,
    pub name_fair: f64,
    pub date_exact: f64,
    pub date_close: f64,
    pub date_recent: f64,
    pub date_acceptable: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            amount: 0.35,
            name_exact: 0.40,
            name_good: 0.30,
            name_fair: 0.20,
            date_exact: 0.40,
            date_close: 0.30,
            date_recent: 0.20,
            date_acceptable: 0.10,
        }
    }
}

impl Weights {
    /// Highest attainable composite: amount + best name + best date.
    pub fn max_composite(&self) -> f64 {
        self.amount + self.name_exact + self.date_exact
    }
}

// ---------------------------------------------------------------------------
// Roles (input sources + column mappings)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    pub transactions: TransactionSource,
    pub attachments: AttachmentSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionSource {
    pub file: String,
    pub columns: TransactionColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionColumns {
    pub record_id: String,
    pub amount: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentSource {
    pub file: String,
    pub columns: AttachmentColumns,
}

/// Candidate dates are not mapped here: every header containing "date"
/// (case-insensitive) feeds the candidate-date set.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentColumns {
    pub record_id: String,
    pub kind: String,
    pub amount: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        self.scoring.validate()
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.amount_tolerance < 0.0 {
            return Err(MatchError::ConfigValidation(format!(
                "amount_tolerance must be >= 0, got {}",
                self.amount_tolerance
            )));
        }
        if self.date_window_days < 0 {
            return Err(MatchError::ConfigValidation(format!(
                "date_window_days must be >= 0, got {}",
                self.date_window_days
            )));
        }
        if !(0.0..=1.0).contains(&self.name_floor) {
            return Err(MatchError::ConfigValidation(format!(
                "name_floor must be within [0, 1], got {}",
                self.name_floor
            )));
        }
        let max = self.weights.max_composite();
        if self.acceptance_threshold <= 0.0 || self.acceptance_threshold > max {
            return Err(MatchError::ConfigValidation(format!(
                "acceptance_threshold must be within (0, {max}], got {}",
                self.acceptance_threshold
            )));
        }
        // Two concordant signals are required by design: no single weight
        // may clear the threshold on its own.
        let strongest = self
            .weights
            .amount
            .max(self.weights.name_exact)
            .max(self.weights.date_exact);
        if strongest >= self.acceptance_threshold {
            return Err(MatchError::ConfigValidation(format!(
                "acceptance_threshold {} is reachable by a single signal (strongest weight {strongest})",
                self.acceptance_threshold
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
