//! Domain errors for ingestion requests
//!
//! Validation failures are collected into a single [`ValidationError`] so the
//! caller sees every broken field at once. [`ProcessingError`] covers failures
//! of the query processor itself, as opposed to errors it reports in its result.

use std::fmt;

use thiserror::Error;

/// A pattern type string that is neither `include` nor `exclude`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid pattern type (expected 'include' or 'exclude')")]
pub struct InvalidPatternType(pub String);

/// A single broken constraint on an ingest request field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `input_text` is empty or whitespace only
    #[error("input_text cannot be empty")]
    EmptyInput,

    /// An integer field is outside its inclusive bounds
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// `pattern_type` does not name a [`PatternType`](super::PatternType)
    #[error("pattern_type: {0}")]
    InvalidPatternType(#[from] InvalidPatternType),
}

impl Violation {
    /// Create an out of range violation
    pub fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

/// Every constraint an ingest request failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Wrap a non-empty list of violations
    pub fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether a violation matching `predicate` was recorded
    pub fn contains(&self, predicate: impl Fn(&Violation) -> bool) -> bool {
        self.violations.iter().any(predicate)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Failures of the query processor that are not reported through its result
///
/// These never carry a user-facing domain error: they surface as internal
/// server errors.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The processor could not be reached or did not answer in time
    #[error("Query processor unreachable: {0}")]
    Transport(String),

    /// The processor answered with a non-success status
    #[error("Query processor returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The processor's result could not be interpreted
    #[error("Malformed query result: {0}")]
    MalformedResult(String),

    /// An unexpected internal error occurred
    #[error("{0}")]
    Internal(String),
}

impl ProcessingError {
    /// Create a transport error with a message
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an upstream status error
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed result error with a message
    pub fn malformed_result(msg: impl Into<String>) -> Self {
        Self::MalformedResult(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for query processing
pub type Result<T> = std::result::Result<T, ProcessingError>;
