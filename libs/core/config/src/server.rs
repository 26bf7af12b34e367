use crate::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::Ipv4Addr;

pub const DEFAULT_PORT: u16 = 8080;

/// Listen address of the HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// "host:port", as passed to the TCP listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - `HOST`: defaults to all interfaces (0.0.0.0)
    /// - `PORT`: defaults to 8080
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", &DEFAULT_PORT.to_string())?;

        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}
