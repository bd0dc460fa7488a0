//! Event-store trait and query helpers

use async_trait::async_trait;
use serde::Serialize;

use crate::error::WarehouseError;
use crate::result::QueryResult;
use crate::Result;

/// A named string query parameter (`@name` in SQL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Parameter name without the `@`
    pub name: String,
    /// String value
    pub value: String,
}

impl QueryParam {
    /// Create a string parameter
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
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

/// Event-store capability consumed by the card engine, the ingest path, and
/// the demo generator
///
/// Implemented by [`BigQueryStore`](crate::BigQueryStore) in production and
/// by in-memory fakes in tests.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Execute a read-only SQL query with named string parameters
    ///
    /// Table names resolve against the configured dataset.
    async fn query(&self, sql: &str, params: &[QueryParam]) -> Result<QueryResult>;

    /// Append rows to a table; returns the number of rows written
    async fn insert_rows(&self, table: &str, rows: &[serde_json::Value]) -> Result<usize>;

    /// Remove all rows from a table
    async fn truncate(&self, table: &str) -> Result<()>;

    /// Idempotently provision the dataset and event tables
    async fn setup(&self) -> Result<SetupReport>;

    /// Check that the warehouse is reachable
    async fn health_check(&self) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Validate SQL for the query path - only SELECT and WITH (CTE) allowed
///
/// A guardrail against accidental writes through the read path, not a
/// security boundary; writes go through `insert_rows`/`truncate`.
pub fn validate_sql(sql: &str) -> Result<()> {
    let trimmed = sql.trim();
    let upper = trimmed.to_uppercase();

    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(WarehouseError::InvalidSql(
            "only SELECT and WITH queries are allowed".to_string(),
        ));
    }

    // SELECT ... INTO creates tables in some dialects
    if upper.contains(" INTO ") {
        return Err(WarehouseError::InvalidSql(
            "SELECT INTO is not allowed".to_string(),
        ));
    }

    // Disallow statement chaining; a trailing semicolon is fine
    if trimmed.contains(';') && !trimmed.ends_with(';') {
        return Err(WarehouseError::InvalidSql(
            "multiple statements not allowed".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sql_select() {
        assert!(validate_sql("SELECT * FROM user_events").is_ok());
        assert!(validate_sql("  select count(*) from company_events  ").is_ok());
        assert!(validate_sql("SELECT * FROM user_events;").is_ok());
    }

    #[test]
    fn test_validate_sql_with() {
        assert!(validate_sql("WITH d AS (SELECT 1) SELECT * FROM d").is_ok());
    }

    #[test]
    fn test_validate_sql_rejects_writes() {
        assert!(validate_sql("INSERT INTO user_events VALUES (1)").is_err());
        assert!(validate_sql("DELETE FROM user_events").is_err());
        assert!(validate_sql("TRUNCATE TABLE user_events").is_err());
        assert!(validate_sql("DROP TABLE user_events").is_err());
    }

    #[test]
    fn test_validate_sql_rejects_chaining() {
        assert!(validate_sql("SELECT 1; DROP TABLE user_events").is_err());
    }

    #[test]
    fn test_validate_sql_rejects_select_into() {
        assert!(validate_sql("SELECT * INTO backup FROM user_events").is_err());
    }

    #[test]
    fn test_setup_report_message() {
        let report = SetupReport {
            created: vec!["events".into()],
            already_existed: vec!["user_events".into(), "company_events".into()],
        };
        let msg = report.message();
        assert!(msg.contains("events"));
        assert!(msg.contains("user_events, company_events"));
    }
}
