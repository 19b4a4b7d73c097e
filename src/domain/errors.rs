//! Domain errors for the strata persistence adapter.

use thiserror::Error;

/// Errors surfaced by repository and blob storage operations.
///
/// Absence of an item, field, or version scope is never an error; each
/// operation signals it through its return value. Only infrastructure
/// failures (the backing store unreachable, a stored document that cannot
/// be decoded) reach this type, and they propagate to the caller unretried.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
