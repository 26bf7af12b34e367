use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware
///
/// Validates the bearer token's signature, expiry, issuer and audience.
/// Inserts [`JwtClaims`](super::JwtClaims) into request extensions on success
/// and answers with a bare 401 otherwise.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{JwtAuth, jwt_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/protected", get(protected_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         jwt_auth_middleware
///     ));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = extract_bearer_token(&headers) else {
        tracing::debug!("No bearer token in Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = match auth.verify_token(token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
