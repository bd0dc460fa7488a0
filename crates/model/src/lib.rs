//! Beacon Model
//!
//! Shared vocabulary for the Beacon analytics service: event row types for
//! the two warehouse tables (`user_events`, `company_events`), the event
//! kind enums, and the table schemas used by warehouse setup and ingest
//! validation.
//!
//! Events are append-only and immutable once written. The warehouse is the
//! single source of truth for all numeric roll-ups; document-store records
//! hold only metadata and forward-looking state.

pub mod events;
pub mod schema;

pub use events::{
    table_for_event_type, CompanyEvent, CompanyEventKind, UserEvent, UserEventKind,
};
pub use schema::{company_events_schema, user_events_schema, FieldSchema};

/// Warehouse table holding user-level events
pub const USER_EVENTS_TABLE: &str = "user_events";

/// Warehouse table holding company/device-level events
pub const COMPANY_EVENTS_TABLE: &str = "company_events";

/// Document-store collections the service depends on
pub const COLLECTIONS: &[&str] = &["users", "companies", "projects", "trending", "renewals"];

/// Annual contract value per purchased device, in dollars
pub const ACV_PER_DEVICE: i64 = 2499;
