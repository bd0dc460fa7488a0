//! Dense day grid for card windows
//!
//! Every time-series card reports one point per calendar day over a fixed
//! trailing window ending today. The grid is always dense; missing days are
//! the roll-up layer's problem, never the consumer's.

use chrono::{Duration, NaiveDate};

/// Days in the card window
pub const WINDOW_DAYS: usize = 30;

/// Days in the rolling sub-window (inclusive of the sample day)
pub const ROLLING_DAYS: i64 = 7;

/// A dense, ascending range of calendar days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGrid {
    days: Vec<NaiveDate>,
}

impl DayGrid {
    /// The `len` days ending at (and including) `end`
    pub fn trailing(end: NaiveDate, len: usize) -> Self {
        let days = (0..len)
            .rev()
            .map(|back| end - Duration::days(back as i64))
            .collect();
        Self { days }
    }

    /// Days in ascending order
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    /// Last day of the window
    pub fn end(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    /// First day any rolling sub-window can reach back to
    pub fn lookback_start(&self) -> NaiveDate {
        self.start() - Duration::days(ROLLING_DAYS - 1)
    }

    /// Number of days
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Chart label for a day ("Jun 03")
    pub fn label(day: NaiveDate) -> String {
        day.format("%b %d").to_string()
    }
}
