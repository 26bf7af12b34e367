//! Identity Domain
//!
//! User registration, role bookkeeping and password login issuing bearer
//! tokens.
//!
//! - Passwords are hashed with Argon2 and checked against [`policy`]
//! - Roles come from the fixed [`Role`] set and are created on demand
//! - Tokens are signed by [`axum_helpers::JwtAuth`]; nothing is persisted per session
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_identity::{AuthService, InMemoryUserRepository, handlers};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!"));
//! let service = AuthService::new(InMemoryUserRepository::new(), jwt);
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, Role, StatusResponse, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::AuthService;
