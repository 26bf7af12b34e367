//! Store API - catalog and authentication REST server

use axum_helpers::JwtAuth;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // Schema plus the seeded categories and products
    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let jwt = JwtAuth::new(&config.jwt);
    info!(uploads_dir = %config.uploads.dir.display(), "Storing product images locally");

    let state = AppState { config, db, jwt };

    let api_routes = api::routes(&state);
    let router = create_router(api_routes);

    // - /health: liveness with app name/version
    // - /ready: readiness with a database round-trip
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting Store API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    let db = state.db;

    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Store API shutdown complete");
    Ok(())
}
