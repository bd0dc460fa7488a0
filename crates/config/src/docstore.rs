//! Document-store settings

use serde::Deserialize;

/// Document store (Firestore) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocstoreConfig {
    /// Database identifier
    /// Default: "(default)"
    pub database: String,

    /// Database location used at creation time
    /// Default: "nam5"
    pub location: String,

    /// API endpoint; point at an emulator to run without credentials
    /// Default: "https://firestore.googleapis.com"
    pub endpoint: String,
}

impl Default for DocstoreConfig {
    fn default() -> Self {
        Self {
            database: "(default)".into(),
            location: "nam5".into(),
            endpoint: "https://firestore.googleapis.com".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: DocstoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.database, "(default)");
        assert_eq!(config.location, "nam5");
    }
}
