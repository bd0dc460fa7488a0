//! API request and response types

use serde::{Deserialize, Serialize};

use beacon_demo::GenerationStats;

/// Query parameters for the card endpoint
#[derive(Debug, Deserialize)]
pub struct CardQuery {
    /// Card id (e.g. "calls_count_7d_window_30d")
    pub card: Option<String>,
}

/// Request body for demo-data creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateDemoRequest {
    /// Upper bound on synthetic users; the configured default when omitted
    pub user_limit: Option<usize>,
}

/// Response for event ingestion
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub success: bool,
    /// Rows appended across both tables
    pub count: usize,
}

/// Response for the setup endpoints
#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub success: bool,
    pub message: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

/// Response for demo-data creation
#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub success: bool,
    pub message: String,
    pub stats: GenerationStats,
}

/// Per-collection counts for the status endpoint
#[derive(Debug, Serialize)]
pub struct CollectionStatus {
    /// All documents, placeholders included
    pub total: u64,
    /// Setup placeholders
    pub placeholders: u64,
    /// Real documents
    pub documents: u64,
}

/// Response for the demo-data status endpoint
#[derive(Debug, Serialize)]
pub struct DemoStatusResponse {
    pub success: bool,
    /// Counts keyed by collection name
    pub collections: std::collections::BTreeMap<String, CollectionStatus>,
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: &'static str,
    /// Warehouse reachability
    pub warehouse: &'static str,
}
