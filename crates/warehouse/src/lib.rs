//! Beacon Warehouse - analytical event-store adapter
//!
//! Executes parameterized SQL against the append-only event tables and
//! returns rows in a backend-agnostic format. The production backend speaks
//! the BigQuery v2 REST API; tests inject fakes through the [`EventStore`]
//! trait.
//!
//! # Usage
//!
//! ```ignore
//! use beacon_warehouse::{BigQueryConfig, BigQueryStore, QueryParam};
//!
//! let store = BigQueryStore::new(BigQueryConfig::new("my-project", "events"), tokens);
//! let result = store
//!     .query(
//!         "SELECT DATE(timestamp) AS day, COUNT(*) AS value \
//!          FROM user_events WHERE company = @company GROUP BY day",
//!         &[QueryParam::string("company", "Initech")],
//!     )
//!     .await?;
//! println!("rows: {}", result.row_count);
//! ```
//!
//! Queries run with the configured dataset as the default, so SQL references
//! bare table names. Writes go through `insert_rows` (batched streaming
//! inserts) and `truncate`; `setup` provisions the dataset and tables
//! idempotently.

pub mod bigquery;
pub mod error;
pub mod result;
pub mod store;

pub use bigquery::{BigQueryConfig, BigQueryStore};
pub use error::WarehouseError;
pub use result::{Column, DataType, QueryResult};
pub use store::{validate_sql, EventStore, QueryParam, SetupReport};

/// Result type for warehouse operations
pub type Result<T> = std::result::Result<T, WarehouseError>;
