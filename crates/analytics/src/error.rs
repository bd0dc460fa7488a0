//! Analytics error types

use thiserror::Error;

/// Analytics errors
///
/// Only `UnknownCard` crosses the engine boundary; everything else is
/// converted to the no-data envelope inside the engine.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Card id is not one of the known set
    #[error("unknown card type: {0}")]
    UnknownCard(String),

    /// Warehouse query failed
    #[error("backend error: {0}")]
    Backend(#[from] beacon_warehouse::WarehouseError),

    /// Result row did not have the expected shape
    #[error("bad row: {0}")]
    BadRow(String),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
