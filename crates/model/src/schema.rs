//! Warehouse table schemas
//!
//! Column definitions for the two event tables, serialized into the shape
//! the warehouse's table-creation API expects. Both tables are
//! day-partitioned on `timestamp` by the setup path.

use serde::Serialize;

/// One column in a warehouse table schema
#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    /// Column name
    pub name: &'static str,
    /// Warehouse type (STRING, INTEGER, TIMESTAMP)
    #[serde(rename = "type")]
    pub field_type: &'static str,
    /// Column mode; everything here is NULLABLE
    pub mode: &'static str,
}

impl FieldSchema {
    fn new(name: &'static str, field_type: &'static str) -> Self {
        Self {
            name,
            field_type,
            mode: "NULLABLE",
        }
    }
}

/// Schema for the `user_events` table
pub fn user_events_schema() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("timestamp", "TIMESTAMP"),
        FieldSchema::new("type", "STRING"),
        FieldSchema::new("user", "STRING"),
        FieldSchema::new("company", "STRING"),
        FieldSchema::new("call_duration", "INTEGER"),
        FieldSchema::new("call_type", "STRING"),
        FieldSchema::new("call_num_users", "INTEGER"),
        FieldSchema::new("call_os", "STRING"),
        FieldSchema::new("rating", "INTEGER"),
        FieldSchema::new("comment", "STRING"),
        FieldSchema::new("session_id", "STRING"),
        FieldSchema::new("dialin_duration", "INTEGER"),
        FieldSchema::new("ticket_number", "STRING"),
        FieldSchema::new("ticket_driver", "STRING"),
    ]
}

/// Schema for the `company_events` table
pub fn company_events_schema() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("timestamp", "TIMESTAMP"),
        FieldSchema::new("type", "STRING"),
        FieldSchema::new("company", "STRING"),
        FieldSchema::new("purchased", "INTEGER"),
        FieldSchema::new("provisioned", "INTEGER"),
        FieldSchema::new("serial_number", "STRING"),
        FieldSchema::new("box_name", "STRING"),
    ]
}
