//! Card payload types
//!
//! The JSON contract consumed by the dashboard's chart widgets. Histories
//! are `[label, value]` pairs with a dense 30-day X axis; the `--` sentinel
//! marks "no data" wherever a value is undefined, so the consumer never has
//! to distinguish null from zero.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// The "no data" sentinel rendered by the dashboard
pub const NO_DATA: &str = "--";

/// One value in a history series
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointValue {
    /// Integer count
    Int(i64),
    /// Fractional value (percentages, averages)
    Float(f64),
    /// No data for this point
    Missing,
}

impl Serialize for PointValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PointValue::Int(v) => serializer.serialize_i64(*v),
            PointValue::Float(v) => serializer.serialize_f64(*v),
            PointValue::Missing => serializer.serialize_str(NO_DATA),
        }
    }
}

/// One `[label, value]` history point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint(pub String, pub PointValue);

/// The large number shown on a card
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardValue {
    /// Integer count
    Int(i64),
    /// Fractional value
    Float(f64),
    /// `{avg, num}` pair for the ratings card
    Rating {
        /// Mean rating over the window
        avg: f64,
        /// Ratings in the window
        num: u64,
    },
    /// `{avg: "--", num: "--"}` when no window held a rating
    RatingMissing,
    /// No data
    Missing,
}

impl Serialize for CardValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CardValue::Int(v) => serializer.serialize_i64(*v),
            CardValue::Float(v) => serializer.serialize_f64(*v),
            CardValue::Rating { avg, num } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("avg", avg)?;
                map.serialize_entry("num", num)?;
                map.end()
            }
            CardValue::RatingMissing => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("avg", NO_DATA)?;
                map.serialize_entry("num", NO_DATA)?;
                map.end()
            }
            CardValue::Missing => serializer.serialize_str(NO_DATA),
        }
    }
}

/// A time-series card: current value plus a 30-day history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesCard {
    /// Current value (the large number)
    pub value: CardValue,
    /// Dense `[label, value]` history, oldest first
    pub history: Vec<HistoryPoint>,
}

impl SeriesCard {
    /// The degraded envelope: no data, empty history
    pub fn no_data() -> Self {
        Self {
            value: CardValue::Missing,
            history: Vec::new(),
        }
    }
}

/// One `[label, count]` breakdown group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownSlice(pub String, pub i64);

/// The calls-breakdown card: three categorical snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreakdownCard {
    /// Calls by type
    pub cbt: Vec<BreakdownSlice>,
    /// Calls by participant count
    pub cbu: Vec<BreakdownSlice>,
    /// Calls by operating system
    pub cbo: Vec<BreakdownSlice>,
}

/// One `[comment, user, timestamp]` entry, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentEntry(pub String, pub String, pub String);

/// The engine's output envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CardPayload {
    /// `{value, history}`
    Series(SeriesCard),
    /// `{cbt, cbu, cbo}`
    Breakdown(BreakdownCard),
    /// Bare array of comment tuples
    Comments(Vec<CommentEntry>),
}
