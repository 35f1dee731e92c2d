//! Error types for data sources

use std::path::PathBuf;
use thiserror::Error;

use crate::combat_log::ParseError;

/// Errors while fetching or assembling report data
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read report dump {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report dump")]
    ParseJson(#[from] serde_json::Error),

    #[error("invalid event record at index {index}")]
    Record {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error("pagination did not advance past timestamp {cursor}")]
    StalledPagination { cursor: i64 },

    #[error("data source unavailable: {reason}")]
    Unavailable { reason: String },
}
