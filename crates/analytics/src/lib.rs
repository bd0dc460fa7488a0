//! Beacon Analytics - the metric-card engine
//!
//! Turns raw event rows into the time series and summary values the
//! dashboard displays. Each card maps to one aggregation shape:
//!
//! - **Cumulative**: running total as of each day in the trailing 30-day
//!   window (devices purchased, devices provisioned, provisioned %,
//!   registered users)
//! - **Rolling window**: a statistic over the trailing 7 days, resampled
//!   daily across the 30-day span (calls, dialins, support tickets, active
//!   users, rating average)
//! - **Breakdown**: categorical snapshot of the most recent 7 days (calls
//!   by type / participant count / OS)
//! - **Recent list**: the latest comments, newest first
//!
//! # Usage
//!
//! ```ignore
//! use beacon_analytics::CardEngine;
//!
//! let engine = CardEngine::new(store);
//! let payload = engine.compute_card("calls_count_7d_window_30d", "Initech").await?;
//! ```
//!
//! The engine is read-only and resilient by design: an unknown card id is
//! the only error a caller sees. Store failures degrade to a success
//! envelope with the `--` sentinel and an empty history, so one broken card
//! cannot blank a page load.

pub mod card;
pub mod engine;
pub mod error;
pub mod payload;
pub mod rollup;
pub mod sql;
pub mod timegrid;

pub use card::Card;
pub use engine::{CardEngine, CustomerOverview};
pub use error::{AnalyticsError, Result};
pub use payload::{
    BreakdownCard, BreakdownSlice, CardPayload, CardValue, CommentEntry, HistoryPoint, PointValue,
    SeriesCard, NO_DATA,
};
pub use timegrid::{DayGrid, ROLLING_DAYS, WINDOW_DAYS};

/// How many recent comments the comments card returns
pub const RECENT_COMMENTS_LIMIT: usize = 10;
