use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_helpers::AppError;
use thiserror::Error;

use crate::models::{CREATION_FAILED_MESSAGE, DUPLICATE_USER_MESSAGE, Role, StatusResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User '{0}' already exists")]
    DuplicateUser(String),

    #[error("User creation failed: {0}")]
    CreationFailed(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Role {0} does not exist")]
    UnknownRole(Role),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUser(name) => {
                AppError::Conflict(format!("User '{}' already exists", name))
            }
            AuthError::CreationFailed(msg) => AppError::BadRequest(msg),
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::UnknownRole(role) => {
                AppError::InternalServerError(format!("Role {} does not exist", role))
            }
            AuthError::PasswordHash(msg) | AuthError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Registration failures keep the {status, message} body with a 500
            AuthError::DuplicateUser(name) => {
                tracing::info!(user_name = %name, "Registration rejected: duplicate user");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusResponse::error(DUPLICATE_USER_MESSAGE)),
                )
                    .into_response()
            }
            AuthError::CreationFailed(reason) => {
                tracing::info!(reason = %reason, "Registration rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusResponse::error(CREATION_FAILED_MESSAGE)),
                )
                    .into_response()
            }
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED.into_response(),
            other => AppError::from(other).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_duplicate_user_is_500_with_status_body() {
        let response = AuthError::DuplicateUser("alice".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: StatusResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body, StatusResponse::error("User already exist!"));
    }

    #[tokio::test]
    async fn test_creation_failed_hides_reason() {
        let response =
            AuthError::CreationFailed("Passwords must have at least one digit".into())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: StatusResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.message, CREATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_credentials_is_bare_401() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_bytes(response).await.is_empty());
    }

    #[test]
    fn test_internal_goes_through_app_error() {
        let response = AuthError::Internal("Database error: boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
