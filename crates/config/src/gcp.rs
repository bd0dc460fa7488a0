//! Google Cloud project and credential settings

use serde::Deserialize;

/// How the adapters authenticate against Google Cloud
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthSetting {
    /// No credentials (emulators, tests)
    Anonymous,
    /// Fixed token from `gcp.token`
    Static,
    /// GCE/Cloud Run metadata server (default for deployed environments)
    #[default]
    Metadata,
}

/// Google Cloud settings shared by both store adapters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GcpConfig {
    /// Project identifier. Required; no default.
    pub project: String,

    /// Credential mode
    pub auth: AuthSetting,

    /// Access token, required when `auth = "static"`
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: GcpConfig = toml::from_str("").unwrap();
        assert!(config.project.is_empty());
        assert_eq!(config.auth, AuthSetting::Metadata);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_auth_modes() {
        for (s, expected) in [
            ("anonymous", AuthSetting::Anonymous),
            ("static", AuthSetting::Static),
            ("metadata", AuthSetting::Metadata),
        ] {
            let toml = format!("auth = \"{}\"", s);
            let config: GcpConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.auth, expected);
        }
    }
}
