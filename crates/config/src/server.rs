//! HTTP server settings

use serde::Deserialize;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    /// Default: "0.0.0.0"
    pub host: String,

    /// Listen port
    /// Default: 8080
    pub port: u16,

    /// Environment tag ("development", "production"); surfaced in logs only
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            environment: "development".into(),
        }
    }
}

impl ServerConfig {
    /// Bind address in host:port form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
