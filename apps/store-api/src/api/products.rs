use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use domain_catalog::{LocalImageStore, PgProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Product routes. Every route requires a valid bearer token.
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let images = LocalImageStore::from_config(&state.config.uploads);
    let service = ProductService::new(repository, images);

    handlers::router(service, state.config.uploads.max_bytes).layer(
        middleware::from_fn_with_state(state.jwt.clone(), jwt_auth_middleware),
    )
}
