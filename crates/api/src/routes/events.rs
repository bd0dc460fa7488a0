//! Event ingestion
//!
//! Accepts a JSON array of event objects, validates each row, and routes it
//! to `user_events` or `company_events` by type. The whole batch is
//! validated before anything is written.

use axum::extract::State;
use axum::Json;

use beacon_model::{table_for_event_type, COMPANY_EVENTS_TABLE, USER_EVENTS_TABLE};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::EventsResponse;

/// POST /api/events - append a batch of events
pub async fn add_events(
    State(state): State<AppState>,
    Json(events): Json<Vec<serde_json::Value>>,
) -> Result<Json<EventsResponse>> {
    if events.is_empty() {
        return Err(ApiError::BadRequest("no event data provided".to_string()));
    }

    let batches = partition_events(&events).map_err(ApiError::BadRequest)?;

    let mut count = 0;
    for (table, rows) in [
        (USER_EVENTS_TABLE, batches.user_rows),
        (COMPANY_EVENTS_TABLE, batches.company_rows),
    ] {
        if rows.is_empty() {
            continue;
        }
        count += state
            .warehouse
            .insert_rows(table, &rows)
            .await
            .map_err(|e| ApiError::Upstream(format!("failed to write to {}: {}", table, e)))?;
    }

    tracing::info!(count, "events ingested");
    Ok(Json(EventsResponse {
        success: true,
        count,
    }))
}

/// Rows split by destination table
#[derive(Debug)]
pub(crate) struct EventBatches {
    pub user_rows: Vec<serde_json::Value>,
    pub company_rows: Vec<serde_json::Value>,
}

/// Validate a batch and split it by destination table
pub(crate) fn partition_events(
    events: &[serde_json::Value],
) -> std::result::Result<EventBatches, String> {
    let mut user_rows = Vec::new();
    let mut company_rows = Vec::new();

    for (i, event) in events.iter().enumerate() {
        let object = event
            .as_object()
            .ok_or_else(|| format!("event {} is not an object", i))?;

        let event_type = object
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| format!("event {} is missing a type", i))?;

        let table = table_for_event_type(event_type)
            .ok_or_else(|| format!("event {} has unknown type '{}'", i, event_type))?;

        if object.get("company").and_then(|c| c.as_str()).unwrap_or("").is_empty() {
            return Err(format!("event {} is missing a company", i));
        }

        if table == USER_EVENTS_TABLE {
            if object.get("user").and_then(|u| u.as_str()).unwrap_or("").is_empty() {
                return Err(format!("event {} is missing a user", i));
            }
            user_rows.push(event.clone());
        } else {
            // The counter matching the type must be present
            if object.get(event_type).and_then(|v| v.as_i64()).is_none() {
                return Err(format!(
                    "event {} is missing the '{}' count",
                    i, event_type
                ));
            }
            company_rows.push(event.clone());
        }
    }

    Ok(EventBatches {
        user_rows,
        company_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partition_mixed_batch() {
        let events = vec![
            json!({"type": "call_started", "user": "a@x.com", "company": "Altostrat",
                   "timestamp": "2024-06-01T10:00:00Z"}),
            json!({"type": "purchased", "company": "Altostrat", "purchased": 5,
                   "timestamp": "2024-06-01T10:00:00Z"}),
            json!({"type": "provisioned", "company": "Altostrat", "provisioned": 1,
                   "timestamp": "2024-06-02T10:00:00Z"}),
            json!({"type": "rating", "user": "a@x.com", "company": "Altostrat", "rating": 5,
                   "timestamp": "2024-06-01T11:00:00Z"}),
        ];

        let batches = partition_events(&events).unwrap();
        assert_eq!(batches.user_rows.len(), 2);
        assert_eq!(batches.company_rows.len(), 2);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let events = vec![json!({"type": "load", "company": "Altostrat"})];
        let err = partition_events(&events).unwrap_err();
        assert!(err.contains("unknown type 'load'"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let missing_type = vec![json!({"company": "Altostrat"})];
        assert!(partition_events(&missing_type).unwrap_err().contains("missing a type"));

        let missing_company = vec![json!({"type": "dialin", "user": "a@x.com"})];
        assert!(partition_events(&missing_company)
            .unwrap_err()
            .contains("missing a company"));

        let missing_user = vec![json!({"type": "dialin", "company": "Altostrat"})];
        assert!(partition_events(&missing_user).unwrap_err().contains("missing a user"));

        let missing_count = vec![json!({"type": "purchased", "company": "Altostrat"})];
        assert!(partition_events(&missing_count)
            .unwrap_err()
            .contains("missing the 'purchased' count"));
    }

    #[test]
    fn test_non_object_rejected() {
        let events = vec![json!("purchased")];
        assert!(partition_events(&events).unwrap_err().contains("not an object"));
    }
}
