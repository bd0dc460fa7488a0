//! Beacon Demo - synthetic data generation
//!
//! Populates the event warehouse and document store with one year of
//! statistically plausible customer activity for demonstrations: companies
//! with monotonic device-purchase stories, users with shaped call / rating /
//! comment / dial-in / ticket streams, and the forward-looking documents
//! (projects, trending metrics, renewals) the overview page reads.
//!
//! Planning is pure and RNG-injected (`DemoPlan::build`), so the mandatory
//! invariants - every timestamp inside the one-year window ending "now",
//! and cumulative provisioned never exceeding cumulative purchased - are
//! enforced by construction and pinned by seeded tests. Writing is a
//! separate, batched pass that reports partial stats if a store fails
//! midway.

pub mod events;
pub mod generator;
pub mod shape;
pub mod vocab;

pub use events::UserProfile;
pub use generator::{DemoPlan, GenerateError, GenerationStats, Generator};
