use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Open a connection pool using the given configuration.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Open a connection pool, retrying with backoff while the server is unreachable.
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
/// use database::common::RetryConfig;
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_from_config_with_retry(config, Some(RetryConfig::new().with_max_retries(10))).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    retry_with_backoff(
        || connect_from_config(config.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
}

/// Apply all pending migrations of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None).await?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}
