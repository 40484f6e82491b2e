use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, missing section, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { role: String, column: String },
    /// Date parse error.
    DateParse { role: String, record_id: String, value: String },
    /// Amount parse error.
    AmountParse { role: String, record_id: String, value: String },
    /// Attachment kind is neither "purchase" nor "sales".
    UnknownKind { record_id: String, value: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { role, column } => {
                write!(f, "role '{role}': missing column '{column}'")
            }
            Self::DateParse { role, record_id, value } => {
                write!(f, "role '{role}', record '{record_id}': cannot parse date '{value}'")
            }
            Self::AmountParse { role, record_id, value } => {
                write!(f, "role '{role}', record '{record_id}': cannot parse amount '{value}'")
            }
            Self::UnknownKind { record_id, value } => {
                write!(f, "record '{record_id}': unknown attachment kind '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MatchError {}
