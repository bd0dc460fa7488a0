//! Document-store trait and document types

use async_trait::async_trait;
use serde::Serialize;

use crate::Result;

/// Plain JSON field map used for document bodies
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Reserved document id used to materialize otherwise-empty collections
pub const PLACEHOLDER_DOC_ID: &str = "_placeholder";

/// A document read back from the store
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Document id within its collection
    pub id: String,
    /// Field values as plain JSON
    pub fields: JsonMap,
}

impl Document {
    /// Whether this is a setup placeholder rather than real data
    pub fn is_placeholder(&self) -> bool {
        self.fields.get("placeholder").and_then(|v| v.as_bool()) == Some(true)
    }
}

/// Single-field equality filter for counts
#[derive(Debug, Clone)]
pub struct FieldFilter {
    /// Field path
    pub field: String,
    /// Value the field must equal
    pub value: serde_json::Value,
}

impl FieldFilter {
    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Outcome of idempotent provisioning
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    /// Objects created by this call
    pub created: Vec<String>,
    /// Objects that already existed
    pub already_existed: Vec<String>,
}

impl SetupReport {
    /// Human-readable summary for API responses
    pub fn message(&self) -> String {
        format!(
            "created: [{}], already existed: [{}]",
            self.created.join(", "),
            self.already_existed.join(", ")
        )
    }
}

/// Document-store capability consumed by the demo generator and the API
///
/// Implemented by [`FirestoreStore`](crate::FirestoreStore) in production
/// and by in-memory fakes in tests. No cross-collection transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or fully overwrite a document
    async fn put(&self, collection: &str, id: &str, fields: &JsonMap) -> Result<()>;

    /// Update the given fields, preserving all others; errors if missing
    async fn update(&self, collection: &str, id: &str, fields: &JsonMap) -> Result<()>;

    /// Delete a document (no error if already gone)
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Write many documents with generated ids; returns the count written
    async fn batch_write(&self, collection: &str, docs: &[JsonMap]) -> Result<usize>;

    /// Delete every document in a collection; returns the count deleted
    async fn delete_all(&self, collection: &str) -> Result<usize>;

    /// List up to `limit` documents
    async fn list(&self, collection: &str, limit: usize) -> Result<Vec<Document>>;

    /// Count documents, optionally restricted by an equality filter
    async fn count(&self, collection: &str, filter: Option<&FieldFilter>) -> Result<u64>;

    /// Idempotently provision the database and required collections
    async fn setup(&self) -> Result<SetupReport>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
