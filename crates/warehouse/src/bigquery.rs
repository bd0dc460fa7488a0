//! BigQuery backend for the event warehouse
//!
//! Talks to the BigQuery v2 REST API: `jobs.query` for reads (named string
//! parameters, dataset-relative table names), `insertAll` for streaming
//! writes, and the datasets/tables endpoints for idempotent setup.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use beacon_gcp::TokenProvider;
use beacon_model::{company_events_schema, user_events_schema, COMPANY_EVENTS_TABLE, USER_EVENTS_TABLE};

use crate::error::WarehouseError;
use crate::result::{Column, DataType, QueryResult};
use crate::store::{validate_sql, EventStore, QueryParam, SetupReport};
use crate::Result;

// =============================================================================
// Configuration
// =============================================================================

/// BigQuery backend configuration
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// Google Cloud project id
    pub project: String,

    /// Dataset holding the event tables
    pub dataset: String,

    /// Dataset location (used at creation time)
    pub location: String,

    /// Dataset description (used at creation time)
    pub description: String,

    /// API endpoint (override for emulators)
    pub endpoint: String,

    /// Rows per insertAll request
    pub insert_batch_size: usize,

    /// Query timeout passed to jobs.query
    pub timeout_ms: u64,

    /// Maximum rows a single query may return
    pub max_results: u64,
}

impl BigQueryConfig {
    /// Create a config with project and dataset; everything else defaulted
    pub fn new(project: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            location: "US".into(),
            description: String::new(),
            endpoint: "https://bigquery.googleapis.com".into(),
            insert_batch_size: 500,
            timeout_ms: 30_000,
            max_results: 10_000,
        }
    }

    /// Set the dataset location and description
    pub fn with_dataset_info(
        mut self,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.location = location.into();
        self.description = description.into();
        self
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the insert batch size
    pub fn with_insert_batch_size(mut self, size: usize) -> Self {
        self.insert_batch_size = size.max(1);
        self
    }
}

// =============================================================================
// Backend Implementation
// =============================================================================

/// BigQuery-backed event store
#[derive(Clone)]
pub struct BigQueryStore {
    client: reqwest::Client,
    tokens: TokenProvider,
    config: BigQueryConfig,
}

impl std::fmt::Debug for BigQueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigQueryStore")
            .field("project", &self.config.project)
            .field("dataset", &self.config.dataset)
            .finish()
    }
}

impl BigQueryStore {
    /// Create a new store
    pub fn new(config: BigQueryConfig, tokens: TokenProvider) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
            config,
        }
    }

    /// Get the config
    pub fn config(&self) -> &BigQueryConfig {
        &self.config
    }

    fn api_base(&self) -> String {
        format!(
            "{}/bigquery/v2/projects/{}",
            self.config.endpoint, self.config.project
        )
    }

    /// Fully qualified, backtick-quoted table reference
    fn qualified_table(&self, table: &str) -> String {
        format!(
            "`{}.{}.{}`",
            self.config.project, self.config.dataset, table
        )
    }

    /// POST a JSON body, returning the parsed JSON response
    ///
    /// `accept_conflict` treats HTTP 409 as success with a `null` body, for
    /// the idempotent setup path.
    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
        accept_conflict: bool,
    ) -> Result<Option<serde_json::Value>> {
        let mut request = self.client.post(url).json(&body);

        if let Some(token) = self.tokens.bearer().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            WarehouseError::Connection(format!("warehouse request failed: {}", e))
        })?;

        let status = response.status();
        if accept_conflict && status == reqwest::StatusCode::CONFLICT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WarehouseError::Execution(format!(
                "warehouse error ({}): {}",
                status, body
            )));
        }

        let value = response
            .json()
            .await
            .map_err(|e| WarehouseError::Serialization(format!("failed to parse response: {}", e)))?;
        Ok(Some(value))
    }

    /// Run a statement through jobs.query without the SELECT guard
    async fn run_statement(&self, sql: &str) -> Result<serde_json::Value> {
        let url = format!("{}/queries", self.api_base());
        let body = json!({
            "query": sql,
            "useLegacySql": false,
            "timeoutMs": self.config.timeout_ms,
        });

        let response = self
            .post_json(&url, body, false)
            .await?
            .unwrap_or(serde_json::Value::Null);

        if response.get("jobComplete").and_then(|v| v.as_bool()) == Some(false) {
            return Err(WarehouseError::Incomplete(
                "statement did not complete within the request timeout".to_string(),
            ));
        }

        Ok(response)
    }

    /// Create the dataset if missing; returns true if it was created
    async fn ensure_dataset(&self) -> Result<bool> {
        let url = format!("{}/datasets", self.api_base());
        let body = json!({
            "datasetReference": {
                "projectId": self.config.project,
                "datasetId": self.config.dataset,
            },
            "location": self.config.location,
            "description": self.config.description,
        });

        let created = self.post_json(&url, body, true).await?.is_some();
        if created {
            tracing::info!(dataset = %self.config.dataset, "created dataset");
        }
        Ok(created)
    }

    /// Create a table if missing; returns true if it was created
    async fn ensure_table(
        &self,
        table: &str,
        schema: &[beacon_model::FieldSchema],
    ) -> Result<bool> {
        let url = format!(
            "{}/datasets/{}/tables",
            self.api_base(),
            self.config.dataset
        );
        let body = json!({
            "tableReference": {
                "projectId": self.config.project,
                "datasetId": self.config.dataset,
                "tableId": table,
            },
            "schema": { "fields": schema },
            "timePartitioning": { "type": "DAY", "field": "timestamp" },
        });

        let created = self.post_json(&url, body, true).await?.is_some();
        if created {
            tracing::info!(table, "created table");
        }
        Ok(created)
    }
}

#[async_trait]
impl EventStore for BigQueryStore {
    async fn query(&self, sql: &str, params: &[QueryParam]) -> Result<QueryResult> {
        validate_sql(sql)?;

        let start = Instant::now();
        let url = format!("{}/queries", self.api_base());

        let mut body = json!({
            "query": sql,
            "useLegacySql": false,
            "timeoutMs": self.config.timeout_ms,
            "maxResults": self.config.max_results,
            "defaultDataset": {
                "projectId": self.config.project,
                "datasetId": self.config.dataset,
            },
        });

        if !params.is_empty() {
            body["parameterMode"] = json!("NAMED");
            body["queryParameters"] = json!(params
                .iter()
                .map(|p| json!({
                    "name": p.name,
                    "parameterType": { "type": "STRING" },
                    "parameterValue": { "value": p.value },
                }))
                .collect::<Vec<_>>());
        }

        let response = self
            .post_json(&url, body, false)
            .await?
            .unwrap_or(serde_json::Value::Null);

        let execution_time_ms = start.elapsed().as_millis() as u64;
        let result = parse_query_response(response, execution_time_ms)?;

        tracing::debug!(
            rows = result.row_count,
            cols = result.columns.len(),
            time_ms = execution_time_ms,
            "warehouse query executed"
        );

        Ok(result)
    }

    async fn insert_rows(&self, table: &str, rows: &[serde_json::Value]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let url = format!(
            "{}/datasets/{}/tables/{}/insertAll",
            self.api_base(),
            self.config.dataset,
            table
        );

        let mut inserted = 0;
        for chunk in rows.chunks(self.config.insert_batch_size) {
            let body = json!({
                "rows": chunk.iter().map(|r| json!({ "json": r })).collect::<Vec<_>>(),
            });

            let response = self
                .post_json(&url, body, false)
                .await?
                .unwrap_or(serde_json::Value::Null);

            if let Some(errors) = response.get("insertErrors").and_then(|v| v.as_array()) {
                if !errors.is_empty() {
                    return Err(WarehouseError::Execution(format!(
                        "insert into {} failed for {} rows: {}",
                        table,
                        errors.len(),
                        errors
                            .first()
                            .map(|e| e.to_string())
                            .unwrap_or_default()
                    )));
                }
            }

            inserted += chunk.len();
            tracing::debug!(table, batch = chunk.len(), total = inserted, "rows inserted");
        }

        Ok(inserted)
    }

    async fn truncate(&self, table: &str) -> Result<()> {
        let sql = format!("TRUNCATE TABLE {}", self.qualified_table(table));
        self.run_statement(&sql).await?;
        tracing::info!(table, "table truncated");
        Ok(())
    }

    async fn setup(&self) -> Result<SetupReport> {
        let mut report = SetupReport {
            created: Vec::new(),
            already_existed: Vec::new(),
        };

        if self.ensure_dataset().await? {
            report.created.push(self.config.dataset.clone());
        } else {
            report.already_existed.push(self.config.dataset.clone());
        }

        let tables = [
            (USER_EVENTS_TABLE, user_events_schema()),
            (COMPANY_EVENTS_TABLE, company_events_schema()),
        ];
        for (table, schema) in tables {
            if self.ensure_table(table, &schema).await? {
                report.created.push(table.to_string());
            } else {
                report.already_existed.push(table.to_string());
            }
        }

        Ok(report)
    }

    async fn health_check(&self) -> Result<()> {
        self.run_statement("SELECT 1").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "bigquery"
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponseJson {
    job_complete: Option<bool>,
    schema: Option<SchemaJson>,
    #[serde(default)]
    rows: Vec<RowJson>,
}

#[derive(Debug, Deserialize)]
struct SchemaJson {
    fields: Vec<FieldJson>,
}

#[derive(Debug, Deserialize)]
struct FieldJson {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
}

#[derive(Debug, Deserialize)]
struct RowJson {
    f: Vec<CellJson>,
}

#[derive(Debug, Deserialize)]
struct CellJson {
    v: serde_json::Value,
}

/// Parse a jobs.query response into a QueryResult
///
/// BigQuery returns every cell value as a JSON string; coerce numeric and
/// boolean columns back to typed values using the declared schema.
pub(crate) fn parse_query_response(
    response: serde_json::Value,
    execution_time_ms: u64,
) -> Result<QueryResult> {
    let parsed: QueryResponseJson = serde_json::from_value(response)?;

    if parsed.job_complete == Some(false) {
        return Err(WarehouseError::Incomplete(
            "query did not complete within the request timeout".to_string(),
        ));
    }

    let columns: Vec<Column> = parsed
        .schema
        .map(|s| {
            s.fields
                .iter()
                .map(|f| Column::new(f.name.clone(), DataType::from_bigquery(&f.field_type)))
                .collect()
        })
        .unwrap_or_default();

    let rows = parsed
        .rows
        .into_iter()
        .map(|row| {
            row.f
                .into_iter()
                .enumerate()
                .map(|(i, cell)| {
                    let dtype = columns.get(i).map(|c| c.data_type).unwrap_or(DataType::Unknown);
                    coerce_cell(cell.v, dtype)
                })
                .collect()
        })
        .collect();

    Ok(QueryResult::new(columns, rows, execution_time_ms))
}

/// Coerce a stringly-typed cell to its schema type
fn coerce_cell(value: serde_json::Value, dtype: DataType) -> serde_json::Value {
    let serde_json::Value::String(s) = value else {
        return value;
    };

    match dtype {
        DataType::Int64 => s
            .parse::<i64>()
            .map(|n| json!(n))
            .unwrap_or(serde_json::Value::String(s)),
        DataType::Float64 => s
            .parse::<f64>()
            .map(|n| json!(n))
            .unwrap_or(serde_json::Value::String(s)),
        DataType::Boolean => match s.as_str() {
            "true" => json!(true),
            "false" => json!(false),
            _ => serde_json::Value::String(s),
        },
        _ => serde_json::Value::String(s),
    }
}

#[cfg(test)]
#[path = "bigquery_test.rs"]
mod bigquery_test;
