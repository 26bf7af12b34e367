//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with cross-cutting middleware
//! - Health and readiness endpoints
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{server::ServerConfig, app_info};
//!
//! let router = create_router(api_routes);
//! let app = router.merge(health_router(app_info!()));
//!
//! create_production_app(app, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
