//! Database connectors and utilities for the store services.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "store_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
