use axum::Router;
use domain_identity::{AuthService, PgUserRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = AuthService::new(repository, state.jwt.clone());

    handlers::router(service)
}
