//! Error types for the database client

use salonbook_common::services::SourceError;
use thiserror::Error;

/// Errors that can occur when working with the database
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A stored row could not be turned into a domain record
    #[error("Invalid row in {table}: {message}")]
    InvalidRow { table: &'static str, message: String },

    /// A write would double-book a staff member
    #[error("Booking conflict: {0}")]
    Conflict(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl DbError {
    pub(crate) fn invalid_row(table: &'static str, message: impl ToString) -> Self {
        DbError::InvalidRow {
            table,
            message: message.to_string(),
        }
    }
}

impl From<DbError> for SourceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(message) => SourceError::Conflict(message),
            DbError::NotFound(message) => SourceError::NotFound(message),
            DbError::InvalidRow { .. } => SourceError::InvalidData(err.to_string()),
            other => SourceError::Fetch(other.to_string()),
        }
    }
}
