//! Beacon Configuration
//!
//! TOML-based configuration with sensible defaults and environment-variable
//! overrides. A minimal deployment needs only a project id:
//!
//! ```toml
//! [gcp]
//! project = "my-project"
//! ```
//!
//! Environment overrides (applied after file loading, highest precedence):
//! `BEACON_PROJECT` (or `GOOGLE_CLOUD_PROJECT`), `BEACON_DATASET`,
//! `BEACON_DATABASE`, `BEACON_PORT`, `BEACON_LOG_LEVEL`, `BEACON_ENV`,
//! `BEACON_ACCESS_TOKEN`.
//!
//! `Config::validate` runs at startup; the adapters receive already-checked
//! values and never re-validate.

mod demo;
mod docstore;
mod error;
mod gcp;
mod logging;
mod server;
mod warehouse;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use demo::DemoConfig;
pub use docstore::DocstoreConfig;
pub use error::{ConfigError, Result};
pub use gcp::{AuthSetting, GcpConfig};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use server::ServerConfig;
pub use warehouse::WarehouseConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Google Cloud project and credentials
    pub gcp: GcpConfig,

    /// Event warehouse (dataset, location, endpoint)
    pub warehouse: WarehouseConfig,

    /// Document store (database, location, endpoint)
    pub docstore: DocstoreConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Demo-data generation knobs
    pub demo: DemoConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        contents.parse()
    }

    /// Load from an optional file path, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment-variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(project) = std::env::var("BEACON_PROJECT") {
            self.gcp.project = project;
        } else if let Ok(project) = std::env::var("GOOGLE_CLOUD_PROJECT") {
            self.gcp.project = project;
        }
        if let Ok(token) = std::env::var("BEACON_ACCESS_TOKEN") {
            self.gcp.auth = AuthSetting::Static;
            self.gcp.token = Some(token);
        }
        if let Ok(dataset) = std::env::var("BEACON_DATASET") {
            self.warehouse.dataset = dataset;
        }
        if let Ok(database) = std::env::var("BEACON_DATABASE") {
            self.docstore.database = database;
        }
        if let Ok(port) = std::env::var("BEACON_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(level) = std::env::var("BEACON_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&level) {
                self.log.level = level;
            }
        }
        if let Ok(env) = std::env::var("BEACON_ENV") {
            self.server.environment = env;
        }
    }

    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.gcp.project.is_empty() {
            return Err(ConfigError::missing("gcp.project"));
        }
        if self.warehouse.dataset.is_empty() {
            return Err(ConfigError::missing("warehouse.dataset"));
        }
        if self.docstore.database.is_empty() {
            return Err(ConfigError::missing("docstore.database"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be nonzero"));
        }
        if self.gcp.auth == AuthSetting::Static && self.gcp.token.is_none() {
            return Err(ConfigError::missing("gcp.token"));
        }
        self.demo.validate()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.warehouse.dataset, "events");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_minimal_config_validates() {
        let config: Config = "[gcp]\nproject = \"demo\"".parse().unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_config_fails_validation() {
        // No project set
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_config_round_trip() {
        let toml = r#"
[gcp]
project = "acme-prod"
auth = "metadata"

[warehouse]
dataset = "metrics"
location = "EU"

[docstore]
database = "dashboard"

[server]
port = 9090
environment = "production"

[log]
level = "debug"
format = "json"
"#;
        let config: Config = toml.parse().unwrap();
        assert_eq!(config.gcp.project, "acme-prod");
        assert_eq!(config.gcp.auth, AuthSetting::Metadata);
        assert_eq!(config.warehouse.dataset, "metrics");
        assert_eq!(config.warehouse.location, "EU");
        assert_eq!(config.docstore.database, "dashboard");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.environment, "production");
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config: Config = "[gcp]\nproject = \"from-file\"".parse().unwrap();

        std::env::set_var("BEACON_PROJECT", "from-env");
        std::env::set_var("BEACON_PORT", "9999");
        config.apply_env();
        std::env::remove_var("BEACON_PROJECT");
        std::env::remove_var("BEACON_PORT");

        assert_eq!(config.gcp.project, "from-env");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_static_auth_requires_token() {
        let config: Config = "[gcp]\nproject = \"demo\"\nauth = \"static\"".parse().unwrap();
        assert!(config.validate().is_err());

        let config: Config =
            "[gcp]\nproject = \"demo\"\nauth = \"static\"\ntoken = \"t\"".parse().unwrap();
        config.validate().unwrap();
    }
}
