use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Handler for 404 Not Found errors.
///
/// Used as the fallback handler of the top-level router.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}
