use super::config::JwtConfig;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime in seconds (24 hours)
pub const TOKEN_TTL: i64 = 86_400;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // Subject (user name)
    pub jti: String,        // JWT ID, fresh per issuance
    pub roles: Vec<String>, // One entry per role membership
    pub iss: String,
    pub aud: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

/// A signed token together with its absolute expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expiration: DateTime<Utc>,
}

/// Stateless JWT issuer and verifier.
///
/// Tokens are HS256-signed, bound to the configured issuer and audience and
/// expire [`TOKEN_TTL`] seconds after issuance. Nothing is persisted; each
/// request is verified by signature and expiry alone.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    issuer: String,
    audience: String,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let jwt_auth = JwtAuth::new(&JwtConfig::from_env()?);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(issuer = %config.issuer, audience = %config.audience, "JWT auth initialized");
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Issue a token for `username` carrying one role claim per entry in `roles`.
    pub fn issue_token(&self, username: &str, roles: &[String]) -> eyre::Result<IssuedToken> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(TOKEN_TTL);

        let claims = JwtClaims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        let token = self.encode_claims(&claims)?;

        Ok(IssuedToken { token, expiration })
    }

    /// Verify JWT signature, expiry, issuer and audience, then decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }

    fn encode_claims(&self, claims: &JwtClaims) -> eyre::Result<String> {
        let header = Header {
            alg: Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }
}
