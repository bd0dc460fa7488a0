//! Firestore backend for the document store
//!
//! Talks to the Firestore v1 REST API: document CRUD under
//! `projects/{p}/databases/{d}/documents`, `batchWrite` for bulk writes and
//! deletes (500-write request limit), `runAggregationQuery` for counts, and
//! the admin databases endpoint for idempotent database creation.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use beacon_gcp::TokenProvider;
use beacon_model::COLLECTIONS;

use crate::error::DocstoreError;
use crate::store::{
    Document, DocumentStore, FieldFilter, JsonMap, SetupReport, PLACEHOLDER_DOC_ID,
};
use crate::value::{from_firestore_fields, to_firestore_fields};
use crate::Result;

// =============================================================================
// Configuration
// =============================================================================

/// Firestore backend configuration
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    pub project: String,

    /// Database id (usually "(default)")
    pub database: String,

    /// Database location (used at creation time)
    pub location: String,

    /// API endpoint (override for emulators)
    pub endpoint: String,

    /// Writes per batchWrite request (hard API limit is 500)
    pub batch_size: usize,

    /// Page size used when draining collections
    pub page_size: usize,
}

impl FirestoreConfig {
    /// Create a config with project and database; everything else defaulted
    pub fn new(project: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            database: database.into(),
            location: "nam5".into(),
            endpoint: "https://firestore.googleapis.com".into(),
            batch_size: 500,
            page_size: 500,
        }
    }

    /// Set the database location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the batch size (clamped to the API limit)
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, 500);
        self
    }
}

// =============================================================================
// Backend Implementation
// =============================================================================

/// Firestore-backed document store
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    tokens: TokenProvider,
    config: FirestoreConfig,
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("project", &self.config.project)
            .field("database", &self.config.database)
            .finish()
    }
}

impl FirestoreStore {
    /// Create a new store
    pub fn new(config: FirestoreConfig, tokens: TokenProvider) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
            config,
        }
    }

    /// Get the config
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// `.../v1/projects/{p}/databases/{d}/documents`
    fn docs_base(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.config.endpoint, self.config.project, self.config.database
        )
    }

    /// Full resource name for a document (used in batchWrite)
    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.config.project, self.config.database, collection, id
        )
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.docs_base(), collection, id)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut builder = builder;
        if let Some(token) = self.tokens.bearer().await? {
            builder = builder.bearer_auth(token);
        }
        builder
            .send()
            .await
            .map_err(|e| DocstoreError::Connection(format!("docstore request failed: {}", e)))
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocstoreError::Execution(format!(
                "docstore error ({}): {}",
                status, body
            )));
        }
        Ok(response)
    }

    /// List one page of documents with their full resource names
    async fn list_page(&self, collection: &str) -> Result<Vec<(String, Document)>> {
        let url = format!("{}/{}", self.docs_base(), collection);
        let response = self
            .send(
                self.client
                    .get(&url)
                    .query(&[("pageSize", self.config.page_size.to_string())]),
            )
            .await?;
        let response = Self::expect_success(response).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DocstoreError::Serialization(e.to_string()))?;

        let docs = body
            .get("documents")
            .and_then(|d| d.as_array())
            .map(|docs| {
                docs.iter()
                    .filter_map(|doc| {
                        let name = doc.get("name")?.as_str()?.to_string();
                        Some((name, parse_document(doc)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(docs)
    }

    /// Issue one batchWrite request, checking per-write status codes
    async fn batch_write_raw(&self, writes: Vec<serde_json::Value>) -> Result<()> {
        let url = format!("{}:batchWrite", self.docs_base());
        let response = self
            .send(self.client.post(&url).json(&json!({ "writes": writes })))
            .await?;
        let response = Self::expect_success(response).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DocstoreError::Serialization(e.to_string()))?;

        if let Some(statuses) = body.get("status").and_then(|s| s.as_array()) {
            let failed = statuses
                .iter()
                .filter(|s| s.get("code").and_then(|c| c.as_i64()).unwrap_or(0) != 0)
                .count();
            if failed > 0 {
                return Err(DocstoreError::Execution(format!(
                    "batch write failed for {} of {} documents",
                    failed,
                    statuses.len()
                )));
            }
        }

        Ok(())
    }

    /// Create the database if missing; returns true if it was created
    async fn ensure_database(&self) -> Result<bool> {
        let url = format!(
            "{}/v1/projects/{}/databases",
            self.config.endpoint, self.config.project
        );
        let body = json!({
            "type": "FIRESTORE_NATIVE",
            "locationId": self.config.location,
        });

        let response = self
            .send(
                self.client
                    .post(&url)
                    .query(&[("databaseId", &self.config.database)])
                    .json(&body),
            )
            .await?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Ok(false);
        }
        Self::expect_success(response).await?;
        tracing::info!(database = %self.config.database, "created database");
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let response = self.send(self.client.get(self.doc_url(collection, id))).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_success(response).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DocstoreError::Serialization(e.to_string()))?;
        Ok(Some(parse_document(&body)))
    }

    async fn put(&self, collection: &str, id: &str, fields: &JsonMap) -> Result<()> {
        let body = json!({ "fields": to_firestore_fields(fields) });
        let response = self
            .send(self.client.patch(self.doc_url(collection, id)).json(&body))
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &JsonMap) -> Result<()> {
        // An update mask per changed field preserves everything else
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.clone()))
            .collect();
        query.push(("currentDocument.exists", "true".into()));

        let body = json!({ "fields": to_firestore_fields(fields) });
        let response = self
            .send(
                self.client
                    .patch(self.doc_url(collection, id))
                    .query(&query)
                    .json(&body),
            )
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DocstoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let response = self
            .send(self.client.delete(self.doc_url(collection, id)))
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn batch_write(&self, collection: &str, docs: &[JsonMap]) -> Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        for chunk in docs.chunks(self.config.batch_size) {
            let writes: Vec<serde_json::Value> = chunk
                .iter()
                .map(|fields| {
                    json!({
                        "update": {
                            "name": self.doc_name(collection, &Uuid::new_v4().to_string()),
                            "fields": to_firestore_fields(fields),
                        }
                    })
                })
                .collect();

            self.batch_write_raw(writes).await?;
            written += chunk.len();
            tracing::debug!(collection, batch = chunk.len(), total = written, "documents written");
        }

        Ok(written)
    }

    async fn delete_all(&self, collection: &str) -> Result<usize> {
        let mut deleted = 0;

        loop {
            let page = self.list_page(collection).await?;
            if page.is_empty() {
                break;
            }

            for chunk in page.chunks(self.config.batch_size) {
                let writes: Vec<serde_json::Value> = chunk
                    .iter()
                    .map(|(name, _)| json!({ "delete": name }))
                    .collect();
                self.batch_write_raw(writes).await?;
                deleted += chunk.len();
            }
        }

        if deleted > 0 {
            tracing::info!(collection, deleted, "collection drained");
        }
        Ok(deleted)
    }

    async fn list(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        let page = self.list_page(collection).await?;
        Ok(page.into_iter().map(|(_, doc)| doc).take(limit).collect())
    }

    async fn count(&self, collection: &str, filter: Option<&FieldFilter>) -> Result<u64> {
        let url = format!("{}:runAggregationQuery", self.docs_base());

        let mut structured_query = json!({
            "from": [{ "collectionId": collection }],
        });
        if let Some(filter) = filter {
            let wrapped: JsonMap =
                std::iter::once((filter.field.clone(), filter.value.clone())).collect();
            let value = to_firestore_fields(&wrapped)[&filter.field].clone();
            structured_query["where"] = json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": "EQUAL",
                    "value": value,
                }
            });
        }

        let body = json!({
            "structuredAggregationQuery": {
                "structuredQuery": structured_query,
                "aggregations": [{ "alias": "total", "count": {} }],
            }
        });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        let response = Self::expect_success(response).await?;

        let results: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DocstoreError::Serialization(e.to_string()))?;
        parse_count_response(&results)
    }

    async fn setup(&self) -> Result<SetupReport> {
        let mut report = SetupReport {
            created: Vec::new(),
            already_existed: Vec::new(),
        };

        if self.ensure_database().await? {
            report.created.push(self.config.database.clone());
        } else {
            report.already_existed.push(self.config.database.clone());
        }

        // A collection exists once it holds a document, so seed each one
        // with a placeholder that the status endpoint can tell apart
        for collection in COLLECTIONS {
            if self.get(collection, PLACEHOLDER_DOC_ID).await?.is_some() {
                report.already_existed.push(collection.to_string());
                continue;
            }
            let fields: JsonMap =
                std::iter::once(("placeholder".to_string(), json!(true))).collect();
            self.put(collection, PLACEHOLDER_DOC_ID, &fields).await?;
            report.created.push(collection.to_string());
        }

        Ok(report)
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

/// Parse a document resource into a Document
pub(crate) fn parse_document(body: &serde_json::Value) -> Document {
    let id = body
        .get("name")
        .and_then(|n| n.as_str())
        .and_then(|n| n.rsplit('/').next())
        .unwrap_or_default()
        .to_string();

    let fields = body
        .get("fields")
        .map(from_firestore_fields)
        .unwrap_or_default();

    Document { id, fields }
}

/// Extract the count from a runAggregationQuery response
pub(crate) fn parse_count_response(results: &serde_json::Value) -> Result<u64> {
    results
        .as_array()
        .and_then(|r| r.first())
        .and_then(|r| r.pointer("/result/aggregateFields/total/integerValue"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            DocstoreError::Serialization("malformed aggregation response".to_string())
        })
}

#[cfg(test)]
#[path = "firestore_test.rs"]
mod firestore_test;
