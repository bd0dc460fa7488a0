//! Day-of-week and time-of-day shaping
//!
//! Uniform noise is easy to spot on a dashboard. Generated activity is
//! damped on weekends and concentrated in business hours so windowed
//! aggregates show the weekly rhythm real customers produce.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;

/// Fraction of weekend-dated events that stay on the weekend
const WEEKEND_KEEP: f64 = 0.25;

/// Move most weekend days to the nearest workday
pub fn shape_day(rng: &mut impl Rng, day: NaiveDate) -> NaiveDate {
    match day.weekday() {
        Weekday::Sat if !rng.gen_bool(WEEKEND_KEEP) => day - Duration::days(1),
        Weekday::Sun if !rng.gen_bool(WEEKEND_KEEP) => day + Duration::days(1),
        _ => day,
    }
}

/// Pick an hour weighted toward business hours
pub fn shaped_hour(rng: &mut impl Rng) -> u32 {
    // Roughly: 70% core business hours, 20% shoulders, 10% anywhere
    let bucket = rng.gen_range(0..100);
    if bucket < 70 {
        rng.gen_range(9..18)
    } else if bucket < 90 {
        *[7, 8, 18, 19, 20].get(rng.gen_range(0..5)).unwrap_or(&12)
    } else {
        rng.gen_range(0..24)
    }
}

/// Place an instant on (a shaped version of) the given day
pub fn event_instant(rng: &mut impl Rng, day: NaiveDate) -> DateTime<Utc> {
    let day = shape_day(rng, day);
    day.and_hms_opt(shaped_hour(rng), rng.gen_range(0..60), rng.gen_range(0..60))
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now)
}

/// Clamp an instant into an inclusive range
pub fn clamp_instant(
    instant: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    instant.max(start).min(end)
}
