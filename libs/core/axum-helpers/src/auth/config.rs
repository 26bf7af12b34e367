//! Configuration types for axum-helpers.
//!
//! This module provides configuration structs that implement the `FromEnv` trait
//! from `core_config`, following the same pattern as `PostgresConfig`.

use core_config::{ConfigError, FromEnv, env_or_default, env_required};

pub const DEFAULT_ISSUER: &str = "store-api";
pub const DEFAULT_AUDIENCE: &str = "store-api-clients";

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - Must be at least 32 characters for security
/// - `JWT_VALID_ISSUER` (optional, default: `store-api`)
/// - `JWT_VALID_AUDIENCE` (optional, default: `store-api-clients`)
///
/// # Example
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// // From environment variables
/// let config = JwtConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = JwtConfig::new("my-super-secret-key-that-is-at-least-32-chars");
/// ```
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,
    /// Value written to and required in the `iss` claim
    pub issuer: String,
    /// Value written to and required in the `aud` claim
    pub audience: String,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret and default issuer/audience.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let issuer = env_or_default("JWT_VALID_ISSUER", DEFAULT_ISSUER);
        let audience = env_or_default("JWT_VALID_AUDIENCE", DEFAULT_AUDIENCE);

        Ok(Self {
            secret,
            issuer,
            audience,
        })
    }
}
