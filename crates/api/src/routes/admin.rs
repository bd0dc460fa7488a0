//! Provisioning and demo-data endpoints

use axum::extract::State;
use axum::Json;
use serde_json::json;

use beacon_docstore::FieldFilter;
use beacon_model::COLLECTIONS;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{
    CollectionStatus, CreateDemoRequest, DemoResponse, DemoStatusResponse, SetupResponse,
};

/// POST /api/setup_bigquery - idempotent dataset and table provisioning
pub async fn setup_bigquery(State(state): State<AppState>) -> Result<Json<SetupResponse>> {
    let report = state
        .warehouse
        .setup()
        .await
        .map_err(|e| ApiError::Upstream(format!("warehouse setup failed: {}", e)))?;

    Ok(Json(SetupResponse {
        success: true,
        message: format!("warehouse setup completed; {}", report.message()),
        project_id: state.names.project.clone(),
        dataset_id: Some(state.names.dataset.clone()),
        database_id: None,
    }))
}

/// POST /api/setup_firestore - idempotent database and collection provisioning
pub async fn setup_firestore(State(state): State<AppState>) -> Result<Json<SetupResponse>> {
    let report = state
        .docstore
        .setup()
        .await
        .map_err(|e| ApiError::Upstream(format!("docstore setup failed: {}", e)))?;

    Ok(Json(SetupResponse {
        success: true,
        message: format!("docstore setup completed; {}", report.message()),
        project_id: state.names.project.clone(),
        dataset_id: None,
        database_id: Some(state.names.database.clone()),
    }))
}

/// POST /api/create_demo_data - synthesize and load a demo dataset
pub async fn create_demo_data(
    State(state): State<AppState>,
    body: Option<Json<CreateDemoRequest>>,
) -> Result<Json<DemoResponse>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let stats = state
        .generator
        .generate(request.user_limit)
        .await
        .map_err(|e| ApiError::DemoFailed {
            message: e.to_string(),
            partial: e.partial,
        })?;

    Ok(Json(DemoResponse {
        success: true,
        message: "demo data created successfully".to_string(),
        stats,
    }))
}

/// GET /api/demo_data_status - per-collection counts, placeholders split out
pub async fn demo_data_status(State(state): State<AppState>) -> Result<Json<DemoStatusResponse>> {
    let placeholder_filter = FieldFilter::eq("placeholder", json!(true));
    let mut collections = std::collections::BTreeMap::new();

    for collection in COLLECTIONS {
        let total = state
            .docstore
            .count(collection, None)
            .await
            .map_err(|e| ApiError::Upstream(format!("count of {} failed: {}", collection, e)))?;
        let placeholders = state
            .docstore
            .count(collection, Some(&placeholder_filter))
            .await
            .map_err(|e| ApiError::Upstream(format!("count of {} failed: {}", collection, e)))?;

        collections.insert(
            collection.to_string(),
            CollectionStatus {
                total,
                placeholders,
                documents: total.saturating_sub(placeholders),
            },
        );
    }

    Ok(Json(DemoStatusResponse {
        success: true,
        collections,
    }))
}
