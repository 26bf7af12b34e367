use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Category {0} does not exist")]
    UnknownCategory(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Image storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            CatalogError::UnknownCategory(id) => {
                AppError::BadRequest(format!("Category {} does not exist", id))
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Multipart(e) => AppError::BadRequest(e.body_text()),
            CatalogError::Io(e) => AppError::Io(e),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            // Clients only get the status for a missing product
            CatalogError::NotFound(id) => {
                tracing::info!(product_id = id, "Product not found");
                StatusCode::NOT_FOUND.into_response()
            }
            // Keeps 413 for oversized uploads
            CatalogError::Multipart(e) => {
                tracing::info!("Rejected multipart body: {}", e);
                e.into_response()
            }
            other => AppError::from(other).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_bare_404() {
        let response = CatalogError::NotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_category_is_400() {
        let response = CatalogError::UnknownCategory(99).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_is_500() {
        let response = CatalogError::Internal("Database error: boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
