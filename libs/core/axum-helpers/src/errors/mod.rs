pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// This structure is returned for all error responses, providing consistent
/// error information to clients including
/// - `code`: Integer error code for logging/monitoring (e.g., 1008)
/// - `error`: Machine-readable error identifier (e.g., "CONFLICT")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Request validation failed",
///   "details": { "username": [ ... ] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type so every
/// service answers with the same envelope.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(DbErr::RecordNotFound(msg)) => {
                tracing::info!(
                    error_code = ErrorCode::DatabaseNotFound.code(),
                    "Database record not found: {}",
                    msg
                );
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(
                        ErrorCode::DatabaseNotFound,
                        ErrorCode::DatabaseNotFound.default_message(),
                    ),
                )
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        ErrorCode::DatabaseError,
                        ErrorCode::DatabaseError.default_message(),
                    ),
                )
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::IoError, ErrorCode::IoError.default_message()),
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    e.status(),
                    ErrorResponse::new(ErrorCode::JsonExtraction, e.body_text()),
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                let details = serde_json::to_value(&e).unwrap_or(serde_json::Value::Null);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        ErrorCode::ValidationError,
                        ErrorCode::ValidationError.default_message(),
                    )
                    .with_details(details),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::BadRequest, msg),
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(ErrorCode::Unauthorized, msg),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(ErrorCode::NotFound, msg),
                )
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(ErrorCode::Conflict, msg),
                )
            }
            AppError::InternalServerError(msg) => {
                // Detail stays in the log; clients get the generic message
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        ErrorCode::InternalError,
                        ErrorCode::InternalError.default_message(),
                    ),
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(ErrorCode::ServiceUnavailable, msg),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let response = AppError::BadRequest("categoryId is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.error, "BAD_REQUEST");
        assert_eq!(body.message, "categoryId is required");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            AppError::InternalServerError("connection reset by peer".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.code, ErrorCode::InternalError.code());
        assert!(!body.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_db_record_not_found_maps_to_404() {
        let response = AppError::from(DbErr::RecordNotFound("products".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_db_errors_map_to_500() {
        let response = AppError::from(DbErr::Custom("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "DATABASE_ERROR");
    }
}
