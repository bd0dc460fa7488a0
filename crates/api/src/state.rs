//! Application state
//!
//! Store handles and the card engine, injected once at startup and shared
//! by every handler. No mutable state; concurrent card requests only share
//! the adapters' connection pools.

use std::sync::Arc;

use beacon_analytics::CardEngine;
use beacon_demo::Generator;
use beacon_docstore::DocumentStore;
use beacon_warehouse::EventStore;

/// Identifiers echoed back by the setup endpoints
#[derive(Debug, Clone)]
pub struct StoreNames {
    /// Google Cloud project id
    pub project: String,
    /// Warehouse dataset id
    pub dataset: String,
    /// Document-store database id
    pub database: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Metric-card engine
    pub engine: CardEngine,
    /// Event warehouse (ingest, setup, health)
    pub warehouse: Arc<dyn EventStore>,
    /// Document store (status, setup)
    pub docstore: Arc<dyn DocumentStore>,
    /// Demo-data generator
    pub generator: Arc<Generator>,
    /// Store identifiers for setup responses
    pub names: StoreNames,
}

impl AppState {
    /// Create application state over the injected stores
    pub fn new(
        warehouse: Arc<dyn EventStore>,
        docstore: Arc<dyn DocumentStore>,
        generator: Arc<Generator>,
        names: StoreNames,
    ) -> Self {
        Self {
            engine: CardEngine::new(Arc::clone(&warehouse)),
            warehouse,
            docstore,
            generator,
            names,
        }
    }
}
