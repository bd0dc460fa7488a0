//! Event-warehouse settings

use serde::Deserialize;

/// Warehouse (BigQuery) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Dataset holding the event tables
    /// Default: "events"
    pub dataset: String,

    /// Dataset location used at creation time
    /// Default: "US"
    pub location: String,

    /// Dataset description used at creation time
    pub description: String,

    /// API endpoint; point at an emulator to run without credentials
    /// Default: "https://bigquery.googleapis.com"
    pub endpoint: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            dataset: "events".into(),
            location: "US".into(),
            description: "Customer usage and device lifecycle events".into(),
            endpoint: "https://bigquery.googleapis.com".into(),
        }
    }
}
