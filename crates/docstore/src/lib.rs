//! Beacon Docstore - keyed document-store adapter
//!
//! CRUD over named collections (customers, projects, renewals, trending)
//! keyed by document id. The production backend speaks the Firestore v1
//! REST API; tests inject fakes through the [`DocumentStore`] trait.
//!
//! Documents hold only metadata and forward-looking state - event-derived
//! numbers live in the warehouse and are never mirrored here.

pub mod error;
pub mod firestore;
pub mod store;
pub mod value;

pub use error::DocstoreError;
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use store::{Document, DocumentStore, FieldFilter, JsonMap, SetupReport, PLACEHOLDER_DOC_ID};
pub use value::{from_firestore_fields, to_firestore_fields};

/// Result type for document-store operations
pub type Result<T> = std::result::Result<T, DocstoreError>;
