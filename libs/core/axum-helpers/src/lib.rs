//! # Axum Helpers
//!
//! A collection of utilities, middleware, and helpers for building Axum web applications.
//!
//! ## Modules
//!
//! - **[`auth`]**: Stateless JWT issuing and verification, bearer middleware
//! - **[`server`]**: Router setup, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (validated JSON)
//! - **[`audit`]**: audit trail on the `audit` tracing target
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router(api_routes);
//!
//!     let config = ServerConfig::default();
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export auth types
pub use auth::{IssuedToken, JwtAuth, JwtClaims, JwtConfig, TOKEN_TTL, jwt_auth_middleware};

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::ValidatedJson;

// Re-export audit types
pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
