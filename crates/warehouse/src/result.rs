//! Query result types
//!
//! Backend-agnostic row format. Values are `serde_json::Value`s typed
//! according to the column's declared [`DataType`].

use serde::{Deserialize, Serialize};

/// Unified query result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column definitions, in select order
    pub columns: Vec<Column>,

    /// Row data as JSON values
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Total row count
    pub row_count: usize,

    /// Query execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create a new query result
    pub fn new(
        columns: Vec<Column>,
        rows: Vec<Vec<serde_json::Value>>,
        execution_time_ms: u64,
    ) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms,
        }
    }

    /// Create an empty result
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            execution_time_ms: 0,
        }
    }

    /// Check if the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Data type
    pub data_type: DataType,
}

impl Column {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Data types supported in query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Signed 64-bit integer
    Int64,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Timestamp
    Timestamp,
    /// Calendar date
    Date,
    /// Unknown/other type
    Unknown,
}

impl DataType {
    /// Map a BigQuery type name to a DataType
    pub fn from_bigquery(type_name: &str) -> Self {
        match type_name {
            "INTEGER" | "INT64" => DataType::Int64,
            "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => DataType::Float64,
            "STRING" => DataType::String,
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "TIMESTAMP" | "DATETIME" | "TIME" => DataType::Timestamp,
            "DATE" => DataType::Date,
            _ => DataType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = QueryResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_column_index() {
        let result = QueryResult::new(
            vec![
                Column::new("day", DataType::Date),
                Column::new("value", DataType::Int64),
            ],
            vec![vec![
                serde_json::json!("2024-06-01"),
                serde_json::json!(3),
            ]],
            5,
        );
        assert_eq!(result.column_index("value"), Some(1));
        assert_eq!(result.column_index("missing"), None);
        assert_eq!(result.row_count, 1);
    }

    #[test]
    fn test_bigquery_type_mapping() {
        assert_eq!(DataType::from_bigquery("INTEGER"), DataType::Int64);
        assert_eq!(DataType::from_bigquery("FLOAT"), DataType::Float64);
        assert_eq!(DataType::from_bigquery("DATE"), DataType::Date);
        assert_eq!(DataType::from_bigquery("GEOGRAPHY"), DataType::Unknown);
    }
}
