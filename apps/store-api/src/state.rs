//! Application state management

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloned into every domain router; the connection pool and the JWT
/// issuer are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    /// Issues login tokens and verifies bearer tokens on product routes
    pub jwt: JwtAuth,
}
