//! Operational endpoints

use axum::extract::State;
use axum::Json;

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health - liveness with warehouse reachability
///
/// Always 200; a down warehouse degrades cards, it does not take the
/// service down.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let warehouse_ok = state.warehouse.health_check().await.is_ok();

    Json(HealthResponse {
        status: if warehouse_ok { "ok" } else { "degraded" },
        warehouse: if warehouse_ok { "ok" } else { "unreachable" },
    })
}
