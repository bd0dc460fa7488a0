//! API routes
//!
//! Domain-grouped handlers composed into one router.

pub mod admin;
pub mod cards;
pub mod events;
pub mod ops;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the complete API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Liveness (no /api prefix, probed by infrastructure)
        .route("/health", get(ops::health))
        // Customer dashboard reads
        .route("/api/customer/{customer}/card", get(cards::get_card))
        .route("/api/customer/{customer}/overview", get(cards::get_overview))
        // Event ingestion
        .route("/api/events", post(events::add_events))
        // Provisioning and demo data
        .route("/api/setup_bigquery", post(admin::setup_bigquery))
        .route("/api/setup_firestore", post(admin::setup_firestore))
        .route("/api/create_demo_data", post(admin::create_demo_data))
        .route("/api/demo_data_status", get(admin::demo_data_status))
        .with_state(state)
}
