//! Document-store error types

/// Errors that can occur talking to the document store
#[derive(Debug, thiserror::Error)]
pub enum DocstoreError {
    /// Request could not reach the store
    #[error("connection failed: {0}")]
    Connection(String),

    /// Store rejected or failed the operation
    #[error("execution failed: {0}")]
    Execution(String),

    /// Document does not exist
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },

    /// Response could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Credential acquisition failed
    #[error("auth error: {0}")]
    Auth(#[from] beacon_gcp::AuthError),
}

impl From<serde_json::Error> for DocstoreError {
    fn from(err: serde_json::Error) -> Self {
        DocstoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for DocstoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            DocstoreError::Connection(err.to_string())
        } else {
            DocstoreError::Execution(err.to_string())
        }
    }
}
