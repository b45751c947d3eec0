//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree model itself.
/// Malformed spreadsheet rows never surface here; the builder recovers from them.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid tree document: {message}")]
    InvalidTree { message: String },

    #[error("unknown root mode '{0}' (expected 'synthetic' or 'auto')")]
    UnknownRootMode(String),

    #[error("invalid column reference: {0}")]
    InvalidColumn(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
