//! Authentication module.
//!
//! This module provides:
//! - Stateless JWT creation and verification (HS256, issuer and audience bound)
//! - Bearer authentication middleware for protected routes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{IssuedToken, JwtAuth, JwtClaims, TOKEN_TTL};
pub use middleware::jwt_auth_middleware;
