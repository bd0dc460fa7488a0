//! Customer dashboard read endpoints

use axum::extract::{Path, Query, State};
use axum::Json;

use beacon_analytics::{AnalyticsError, CardPayload, CustomerOverview};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::CardQuery;

/// GET /api/customer/{customer}/card?card=<id> - one metric card
///
/// Store failures come back as the `--` envelope with HTTP 200; only a
/// missing or unknown card id is an error.
pub async fn get_card(
    State(state): State<AppState>,
    Path(customer): Path<String>,
    Query(query): Query<CardQuery>,
) -> Result<Json<CardPayload>> {
    let card_id = query
        .card
        .ok_or_else(|| ApiError::Card("missing card parameter".to_string()))?;

    let payload = state
        .engine
        .compute_card(&card_id, &customer)
        .await
        .map_err(map_engine_error)?;

    Ok(Json(payload))
}

/// GET /api/customer/{customer}/overview - device total and ACV
pub async fn get_overview(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Json<CustomerOverview> {
    Json(state.engine.overview(&customer).await)
}

pub(crate) fn map_engine_error(err: AnalyticsError) -> ApiError {
    match err {
        AnalyticsError::UnknownCard(_) => ApiError::Card(err.to_string()),
        other => ApiError::Upstream(other.to_string()),
    }
}
