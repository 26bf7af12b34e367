use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use axum_helpers::{AuditEvent, AuditOutcome, ValidatedJson};
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::models::{
    LoginRequest, LoginResponse, RegisterRequest, StatusResponse, USER_CREATED_MESSAGE,
};
use crate::repository::UserRepository;
use crate::service::AuthService;

type SharedService<R> = Arc<AuthService<R>>;

/// Create the authentication router (`/register`, `/register-admin`, `/login`).
pub fn router<R: UserRepository + 'static>(service: AuthService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/register", post(register))
        .route("/register-admin", post(register_admin))
        .route("/login", post(login))
        .with_state(shared_service)
}

async fn register<R: UserRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> AuthResult<Json<StatusResponse>> {
    let user_name = request.username.clone();
    let result = service.register(request).await;

    audit(&headers, "user.register", &user_name, &result);
    result?;
    Ok(Json(StatusResponse::success(USER_CREATED_MESSAGE)))
}

async fn register_admin<R: UserRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> AuthResult<Json<StatusResponse>> {
    let user_name = request.username.clone();
    let result = service.register_admin(request).await;

    audit(&headers, "user.register_admin", &user_name, &result);
    result?;
    Ok(Json(StatusResponse::success(USER_CREATED_MESSAGE)))
}

async fn login<R: UserRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>> {
    let user_name = request.username.clone();
    let result = service.login(request).await;

    audit(&headers, "user.login", &user_name, &result);
    result.map(Json)
}

fn audit<T>(headers: &HeaderMap, action: &str, user_name: &str, result: &AuthResult<T>) {
    let outcome = match result {
        Ok(_) => AuditOutcome::Success,
        Err(AuthError::InvalidCredentials) => AuditOutcome::Denied,
        Err(_) => AuditOutcome::Failure,
    };

    let mut event = AuditEvent::new(
        Some(user_name.to_string()),
        action,
        Some(format!("user:{}", user_name)),
        outcome,
    )
    .with_request(headers);

    if let Err(e) = result {
        event = event.with_details(serde_json::json!({ "error": e.to_string() }));
    }

    event.log();
}
