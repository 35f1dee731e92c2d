//! Error types for report queries

use thiserror::Error;

use crate::combat_log::{CollectionError, SelectorError};
use crate::phases::PhaseError;
use crate::source::SourceError;

/// Errors surfaced by [`Report`](super::Report) operations
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to fetch report data")]
    Source(#[from] SourceError),

    #[error("phase lookup failed")]
    Phase(#[from] PhaseError),

    #[error("invalid event query")]
    Collection(#[from] CollectionError),

    #[error("invalid ability selector")]
    Selector(#[from] SelectorError),
}
