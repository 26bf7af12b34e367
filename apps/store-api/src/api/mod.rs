use axum::Router;

pub mod auth;
pub mod health;
pub mod products;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
///
/// Lowercase spellings of the resource paths are served as well.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/Authenticate", auth::router(state))
        .nest("/authenticate", auth::router(state))
        .nest("/Product", products::router(state))
        .nest("/product", products::router(state))
}

/// Router with the /ready endpoint, merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
