//! Machine-readable codes carried in the `code` field of [`ErrorResponse`].
//!
//! Clients branch on the string form; the numeric form groups codes for log
//! queries (1xxx request and service, 2xxx database, 4xxx filesystem).
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::IoError.as_str(), "IO_ERROR");
//! assert_eq!(ErrorCode::IoError.code(), 4001);
//! ```
//!
//! [`ErrorResponse`]: super::ErrorResponse

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A `validator` rule failed on a JSON body
    ValidationError,
    NotFound,
    /// Missing, expired or foreign bearer token
    Unauthorized,
    Conflict,
    /// Body was not JSON or did not match the request type
    JsonExtraction,
    /// Multipart field that could not be read or parsed
    BadRequest,
    InternalError,
    /// A readiness probe failed
    ServiceUnavailable,
    DatabaseNotFound,
    DatabaseError,
    /// Upload directory could not be written or cleaned
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Conflict => 1008,
            Self::ServiceUnavailable => 1011,
            Self::BadRequest => 1012,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,

            Self::IoError => 4001,
        }
    }

    /// Message used when the error carries none of its own
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "A valid bearer token is required",
            Self::Conflict => "Resource already exists",
            Self::JsonExtraction => "Failed to parse request body",
            Self::BadRequest => "Form data could not be read",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseError => "Database error occurred",
            Self::IoError => "File storage error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
