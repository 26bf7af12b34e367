//! Audit trail for account and catalog changes.
//!
//! Events go to the `audit` tracing target as one structured record each, so
//! they can be filtered apart from request logs (`RUST_LOG=audit=info`).
//!
//! ```ignore
//! use axum_helpers::audit::{AuditEvent, AuditOutcome};
//!
//! AuditEvent::new(Some(claims.sub.clone()), "product.delete", Some(format!("product:{}", id)), AuditOutcome::Success)
//!     .with_request(&headers)
//!     .log();
//! ```

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    /// Rejected input or a server-side error
    Failure,
    /// Wrong credentials or missing authorization
    Denied,
}

/// One audited action: who did what to which record, and how it ended
#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// Token subject or the user name being registered; `None` when anonymous
    pub user_id: Option<String>,
    /// Dotted verb such as `user.login` or `product.update`
    pub action: String,
    /// `kind:key`, e.g. `product:12` or `user:alice`
    pub resource: Option<String>,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        user_id: Option<String>,
        action: impl Into<String>,
        resource: Option<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            user_id,
            action: action.into(),
            resource,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Client address and user agent taken from the request headers
    pub fn with_request(self, headers: &HeaderMap) -> Self {
        self.with_ip(extract_ip_from_headers(headers))
            .with_user_agent(extract_user_agent(headers))
    }

    /// Attach free-form context. Values that fail to serialize are dropped.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Emit at info level on the `audit` target
    pub fn log(self) {
        let record = serde_json::to_string(&self)
            .unwrap_or_else(|_| format!("{} ({:?})", self.action, self.outcome));

        tracing::info!(
            target: "audit",
            user_id = self.user_id,
            action = %self.action,
            resource = self.resource,
            outcome = ?self.outcome,
            ip = self.ip_address,
            user_agent = self.user_agent,
            details = ?self.details,
            "{}",
            record
        );
    }
}

/// Client address behind a reverse proxy: the first `X-Forwarded-For` hop,
/// else `X-Real-IP`
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    forwarded
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::to_string)
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
