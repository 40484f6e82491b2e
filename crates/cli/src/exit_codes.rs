//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success, every transaction linked            |
//! | 2    | CLI usage error (clap)                       |
//! | 3    | Run completed but some transactions unmatched |
//! | 4    | Invalid config                               |
//! | 5    | Runtime error (IO, malformed records)        |

pub const EXIT_SUCCESS: u8 = 0;

/// Run completed; one or more transactions have no accepted link.
pub const EXIT_UNMATCHED: u8 = 3;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// IO failure or malformed input records.
pub const EXIT_RUNTIME: u8 = 5;
