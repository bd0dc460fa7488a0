//! Beacon API
//!
//! HTTP layer for the customer-success dashboard, built on Axum.
//!
//! # Endpoints
//!
//! - `GET  /health` - liveness, with warehouse reachability
//! - `GET  /api/customer/{customer}/card?card=<id>` - one metric card
//! - `GET  /api/customer/{customer}/overview` - device total and ACV
//! - `POST /api/events` - append a JSON array of events
//! - `POST /api/setup_bigquery` - idempotent warehouse provisioning
//! - `POST /api/setup_firestore` - idempotent docstore provisioning
//! - `POST /api/create_demo_data` - synthesize demo data
//! - `GET  /api/demo_data_status` - per-collection document counts
//!
//! # Usage
//!
//! ```ignore
//! use beacon_api::{build_router, AppState};
//!
//! let state = AppState::new(warehouse, docstore, generator, names);
//! let app = build_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! Card reads degrade to the `--` envelope on store failure (HTTP 200);
//! only a malformed card id produces `{"error": ...}`. Write paths surface
//! failures with a `success` flag and message.

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::{AppState, StoreNames};
