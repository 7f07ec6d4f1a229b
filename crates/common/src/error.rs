//! Error types

use thiserror::Error;

/// Main error type for Quiz Seasons
///
/// The variants mirror the caller-facing taxonomy: what does not exist,
/// what the caller is not entitled to, and what was already done.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but not entitled: outside the season window, season
    /// not started, or a non-administrator calling an admin operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Action already performed: season already completed, question
    /// already attempted. Uniqueness violations under concurrent writes
    /// are translated here, never propagated as storage faults.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input, rejected before any storage access.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing, expired, or tampered credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Database(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
