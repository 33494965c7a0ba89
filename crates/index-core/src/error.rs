//! Structured error type for the peripheral layers (CLI, script loader).
//!
//! The engines themselves never raise: every engine-visible condition
//! (duplicate key, absent key) is encoded in a boolean return value, per
//! spec.md §5 and §7. `IndexError` is only ever produced at the script
//! loader / CLI boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid CLI option combination or out-of-range configuration value.
    #[error("usage error: {0}")]
    Usage(String),

    /// The CSV script file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV row contained a non-integer field.
    #[error("parse error on row {row}: {detail}")]
    Parse { row: usize, detail: String },

    /// A malformed CSV row structure (missing operation column, etc).
    #[error("malformed row {row}: {detail}")]
    Malformed { row: usize, detail: String },
}
