//! Roll-up math over the day grid
//!
//! The engine queries daily buckets (one row per day with events) and these
//! functions turn them into the dense series the cards report: cumulative
//! partial sums, sliding-window counts and averages, and windowed distinct
//! counts. One bucket query per card; the window math happens here.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};

use crate::error::{AnalyticsError, Result};
use crate::timegrid::{DayGrid, ROLLING_DAYS};

use beacon_warehouse::QueryResult;

/// Round to two decimals, the precision every card reports
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Row Parsing
// =============================================================================

fn parse_day(value: &serde_json::Value) -> Result<NaiveDate> {
    let s = value
        .as_str()
        .ok_or_else(|| AnalyticsError::BadRow(format!("expected date string, got {}", value)))?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| AnalyticsError::BadRow(format!("bad date '{}': {}", s, e)))
}

fn parse_number(value: &serde_json::Value) -> f64 {
    value
        .as_f64()
        .or_else(|| value.as_i64().map(|i| i as f64))
        .unwrap_or(0.0)
}

fn column(result: &QueryResult, name: &str) -> Result<usize> {
    result
        .column_index(name)
        .ok_or_else(|| AnalyticsError::BadRow(format!("missing column '{}'", name)))
}

/// Parse `(day, value)` rows into a per-day map
pub fn daily_values(result: &QueryResult) -> Result<BTreeMap<NaiveDate, f64>> {
    if result.is_empty() {
        return Ok(BTreeMap::new());
    }
    let day_idx = column(result, "day")?;
    let value_idx = column(result, "value")?;

    let mut values = BTreeMap::new();
    for row in &result.rows {
        let day = parse_day(&row[day_idx])?;
        values.insert(day, parse_number(&row[value_idx]));
    }
    Ok(values)
}

/// Parse a single-row aggregate (`value` column), zero when empty
pub fn scalar_value(result: &QueryResult) -> Result<f64> {
    if result.is_empty() {
        return Ok(0.0);
    }
    let value_idx = column(result, "value")?;
    Ok(parse_number(&result.rows[0][value_idx]))
}

/// Parse `(day, total, num)` rating rows
pub fn daily_rating_stats(result: &QueryResult) -> Result<BTreeMap<NaiveDate, (f64, u64)>> {
    if result.is_empty() {
        return Ok(BTreeMap::new());
    }
    let day_idx = column(result, "day")?;
    let total_idx = column(result, "total")?;
    let num_idx = column(result, "num")?;

    let mut stats = BTreeMap::new();
    for row in &result.rows {
        let day = parse_day(&row[day_idx])?;
        let total = parse_number(&row[total_idx]);
        let num = parse_number(&row[num_idx]) as u64;
        stats.insert(day, (total, num));
    }
    Ok(stats)
}

/// Parse `(day, user)` rows into per-day user sets
pub fn daily_users(result: &QueryResult) -> Result<BTreeMap<NaiveDate, HashSet<String>>> {
    if result.is_empty() {
        return Ok(BTreeMap::new());
    }
    let day_idx = column(result, "day")?;
    let user_idx = column(result, "user")?;

    let mut users: BTreeMap<NaiveDate, HashSet<String>> = BTreeMap::new();
    for row in &result.rows {
        let day = parse_day(&row[day_idx])?;
        let user = row[user_idx].as_str().unwrap_or_default().to_string();
        users.entry(day).or_default().insert(user);
    }
    Ok(users)
}

// =============================================================================
// Series Construction
// =============================================================================

fn window_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(ROLLING_DAYS - 1)
}

/// Cumulative partial sums over the grid
///
/// `baseline` is the total accumulated before the grid starts. Days with no
/// events repeat the prior value, so the series is non-decreasing whenever
/// the daily deltas are non-negative.
pub fn cumulative(grid: &DayGrid, baseline: f64, daily: &BTreeMap<NaiveDate, f64>) -> Vec<f64> {
    let mut running = baseline;
    grid.days()
        .iter()
        .map(|day| {
            running += daily.get(day).copied().unwrap_or(0.0);
            running
        })
        .collect()
}

/// Sliding-window sums: for each grid day, the daily totals over
/// `[day - 6, day]` inclusive
pub fn rolling_sum(grid: &DayGrid, daily: &BTreeMap<NaiveDate, f64>) -> Vec<f64> {
    grid.days()
        .iter()
        .map(|day| daily.range(window_start(*day)..=*day).map(|(_, v)| v).sum())
        .collect()
}

/// Sliding-window averages from per-day (total, count) stats
///
/// A window with zero qualifying events yields `None` - the average is
/// never computed over an empty window.
pub fn rolling_avg(grid: &DayGrid, stats: &BTreeMap<NaiveDate, (f64, u64)>) -> Vec<Option<f64>> {
    grid.days()
        .iter()
        .map(|day| {
            let (total, num) = window_stats(stats, *day);
            (num > 0).then(|| round2(total / num as f64))
        })
        .collect()
}

fn window_stats(stats: &BTreeMap<NaiveDate, (f64, u64)>, day: NaiveDate) -> (f64, u64) {
    stats
        .range(window_start(day)..=day)
        .fold((0.0, 0u64), |(t, n), (_, &(total, num))| (t + total, n + num))
}

/// Sliding-window distinct-user counts from per-day user sets
pub fn rolling_distinct(
    grid: &DayGrid,
    daily: &BTreeMap<NaiveDate, HashSet<String>>,
) -> Vec<u64> {
    grid.days()
        .iter()
        .map(|day| {
            let mut seen: HashSet<&str> = HashSet::new();
            for (_, users) in daily.range(window_start(*day)..=*day) {
                seen.extend(users.iter().map(String::as_str));
            }
            seen.len() as u64
        })
        .collect()
}

/// Per-day provisioned-of-purchased percentage
///
/// `None` wherever nothing has been purchased yet - the ratio is undefined,
/// not zero.
pub fn pct_series(purchased: &[f64], provisioned: &[f64]) -> Vec<Option<f64>> {
    purchased
        .iter()
        .zip(provisioned)
        .map(|(p, v)| (*p > 0.0).then(|| round2(v / p * 100.0)))
        .collect()
}

/// Current value for the ratings card: the most recent day whose window
/// contained at least one rating
pub fn last_rating_value(
    grid: &DayGrid,
    stats: &BTreeMap<NaiveDate, (f64, u64)>,
) -> Option<(f64, u64)> {
    grid.days().iter().rev().find_map(|day| {
        let (total, num) = window_stats(stats, *day);
        (num > 0).then(|| (round2(total / num as f64), num))
    })
}
