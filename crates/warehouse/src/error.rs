//! Warehouse error types

/// Errors that can occur talking to the event warehouse
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// Request could not reach the warehouse
    #[error("connection failed: {0}")]
    Connection(String),

    /// Warehouse rejected or failed the operation
    #[error("execution failed: {0}")]
    Execution(String),

    /// Invalid SQL (only SELECT/WITH allowed on the query path)
    #[error("invalid SQL: {0}")]
    InvalidSql(String),

    /// Query did not finish within the request timeout
    #[error("query incomplete: {0}")]
    Incomplete(String),

    /// Response could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Credential acquisition failed
    #[error("auth error: {0}")]
    Auth(#[from] beacon_gcp::AuthError),
}

impl From<serde_json::Error> for WarehouseError {
    fn from(err: serde_json::Error) -> Self {
        WarehouseError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for WarehouseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            WarehouseError::Connection(err.to_string())
        } else {
            WarehouseError::Execution(err.to_string())
        }
    }
}
