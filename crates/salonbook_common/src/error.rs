use crate::services::SourceError;
use crate::time::TimeParseError;
use thiserror::Error;

/// The base error type for all Salonbook errors.
///
/// Each crate keeps its own error enum and converts into this one at the HTTP edge.
#[derive(Error, Debug)]
pub enum SalonbookError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to a conflict (e.g., the slot was booked meanwhile)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A backing store could not be reached; nothing was computed
    #[error("Service unavailable: {0}")]
    UnavailableError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SalonbookError {
    fn status_code(&self) -> u16 {
        match self {
            SalonbookError::ParseError(_) => 400,
            SalonbookError::ConfigError(_) => 500,
            SalonbookError::ValidationError(_) => 400,
            SalonbookError::DatabaseError(_) => 500,
            SalonbookError::ConflictError(_) => 409,
            SalonbookError::NotFoundError(_) => 404,
            SalonbookError::UnavailableError(_) => 503,
            SalonbookError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for SalonbookError {
    fn from(err: serde_json::Error) -> Self {
        SalonbookError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for SalonbookError {
    fn from(err: std::io::Error) -> Self {
        SalonbookError::InternalError(err.to_string())
    }
}

impl From<TimeParseError> for SalonbookError {
    fn from(err: TimeParseError) -> Self {
        match err {
            TimeParseError::UnknownTimeZone(_) => SalonbookError::ConfigError(err.to_string()),
            _ => SalonbookError::ParseError(err.to_string()),
        }
    }
}

impl From<SourceError> for SalonbookError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(msg) => SalonbookError::NotFoundError(msg),
            SourceError::Conflict(msg) => SalonbookError::ConflictError(msg),
            SourceError::Fetch(msg) => SalonbookError::UnavailableError(msg),
            SourceError::InvalidData(msg) => SalonbookError::DatabaseError(msg),
        }
    }
}
