//! Error types for the event model

use thiserror::Error;

use crate::report::ReportId;

/// Errors while normalizing a raw event record
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("event record is not a JSON object")]
    NotAnObject,

    #[error("event record is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' has an invalid value: {detail}")]
    InvalidValue { field: &'static str, detail: String },
}

/// Errors from event collection operations
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("cannot combine events from report {left} with events from report {right}")]
    ContextMismatch { left: ReportId, right: ReportId },

    #[error("invalid time window: start {start} is after end {end}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("range {start}..{end} is out of bounds for {len} events")]
    OutOfRange { start: usize, end: usize, len: usize },
}

/// Errors while interpreting user-supplied selectors
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("malformed selector '{input}': {reason}")]
    Malformed { input: String, reason: &'static str },
}
