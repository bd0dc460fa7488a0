//! Card computation engine
//!
//! Maps each card to its queries and roll-up, and converts every store
//! failure into the no-data envelope so a broken warehouse degrades a card
//! instead of failing the page.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use beacon_model::{ACV_PER_DEVICE, COMPANY_EVENTS_TABLE, USER_EVENTS_TABLE};
use beacon_warehouse::{EventStore, QueryParam, QueryResult};

use crate::card::Card;
use crate::error::{AnalyticsError, Result};
use crate::payload::{
    BreakdownCard, BreakdownSlice, CardPayload, CardValue, CommentEntry, HistoryPoint, PointValue,
    SeriesCard,
};
use crate::rollup;
use crate::sql::{self, BreakdownOrder};
use crate::timegrid::{DayGrid, ROLLING_DAYS, WINDOW_DAYS};
use crate::RECENT_COMMENTS_LIMIT;

/// Event types that count a user as active
const ACTIVITY_TYPES: &[&str] = &["call_started", "dialin"];

/// Customer overview: device total and annual contract value
#[derive(Debug, Clone, Serialize)]
pub struct CustomerOverview {
    /// Company identifier
    pub customer: String,
    /// Devices purchased, all time
    pub purchased: i64,
    /// Annual contract value in dollars
    pub acv: i64,
}

/// The metric-card engine
///
/// Read-only over an injected [`EventStore`]; cheap to clone.
#[derive(Clone)]
pub struct CardEngine {
    store: Arc<dyn EventStore>,
}

impl CardEngine {
    /// Create an engine over a store
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Compute a card by wire id
    ///
    /// An unknown id is the only error returned; store failures degrade to
    /// the no-data envelope inside.
    pub async fn compute_card(&self, card_id: &str, company: &str) -> Result<CardPayload> {
        let card = Card::parse(card_id)?;
        Ok(self.compute(card, company).await)
    }

    /// Compute a card, degrading any failure to the no-data envelope
    pub async fn compute(&self, card: Card, company: &str) -> CardPayload {
        match self.compute_inner(card, company).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(
                    card = card.id(),
                    company,
                    error = %err,
                    "card degraded to no-data"
                );
                degraded(card)
            }
        }
    }

    /// Customer overview; failures degrade to zero totals
    pub async fn overview(&self, company: &str) -> CustomerOverview {
        let sql = sql::counter_total(COMPANY_EVENTS_TABLE, "purchased", "purchased");
        let purchased = match self.store.query(&sql, &params(company)).await {
            Ok(result) => rollup::scalar_value(&result).unwrap_or(0.0) as i64,
            Err(err) => {
                tracing::warn!(company, error = %err, "overview degraded to zero");
                0
            }
        };

        CustomerOverview {
            customer: company.to_string(),
            purchased,
            acv: purchased * ACV_PER_DEVICE,
        }
    }

    async fn compute_inner(&self, card: Card, company: &str) -> Result<CardPayload> {
        match card {
            Card::BoxesPurchasedCumulative30d => {
                self.cumulative_counter(company, "purchased", "purchased").await
            }
            Card::BoxesProvisionedCumulative30d => {
                self.cumulative_counter(company, "provisioned", "provisioned").await
            }
            Card::BoxesProvisionedPctCumulative30d => self.provisioned_pct(company).await,
            Card::UsersRegisteredCumulative30d => self.cumulative_registrations(company).await,
            Card::CallsCount7dWindow30d => self.rolling_count(company, &["call_started"]).await,
            Card::DialinCount7dWindow30d => self.rolling_count(company, &["dialin"]).await,
            Card::SupportTickets7dWindow30d => {
                self.rolling_count(company, &["support_ticket"]).await
            }
            Card::UsersActive7dWindow30d => self.active_users(company).await,
            Card::RatingsAverage7dWindow30d => self.ratings_average(company).await,
            Card::CallsBreakdown7d => self.calls_breakdown(company).await,
            Card::CommentsRecent7d => self.recent_comments(company).await,
        }
    }

    fn grid(&self) -> DayGrid {
        DayGrid::trailing(Utc::now().date_naive(), WINDOW_DAYS)
    }

    /// Cumulative running sum of a company-event counter column
    async fn cumulative_counter(
        &self,
        company: &str,
        counter: &str,
        event_type: &str,
    ) -> Result<CardPayload> {
        let grid = self.grid();
        let series = self
            .cumulative_counter_series(&grid, company, counter, event_type)
            .await?;
        Ok(int_series(&grid, &series))
    }

    async fn cumulative_counter_series(
        &self,
        grid: &DayGrid,
        company: &str,
        counter: &str,
        event_type: &str,
    ) -> Result<Vec<f64>> {
        let params = params(company);

        let baseline_sql =
            sql::counter_baseline(COMPANY_EVENTS_TABLE, counter, event_type, grid.start());
        let baseline = rollup::scalar_value(&self.store.query(&baseline_sql, &params).await?)?;

        let daily_sql = sql::daily_counter_sum(
            COMPANY_EVENTS_TABLE,
            counter,
            event_type,
            grid.start(),
            grid.end(),
        );
        let daily = rollup::daily_values(&self.store.query(&daily_sql, &params).await?)?;

        Ok(rollup::cumulative(grid, baseline, &daily))
    }

    /// Provisioned devices as a percentage of purchased, per day
    async fn provisioned_pct(&self, company: &str) -> Result<CardPayload> {
        let grid = self.grid();
        let purchased = self
            .cumulative_counter_series(&grid, company, "purchased", "purchased")
            .await?;
        let provisioned = self
            .cumulative_counter_series(&grid, company, "provisioned", "provisioned")
            .await?;

        let series = rollup::pct_series(&purchased, &provisioned);
        Ok(float_series(&grid, &series))
    }

    /// Cumulative count of registration events
    async fn cumulative_registrations(&self, company: &str) -> Result<CardPayload> {
        let grid = self.grid();
        let params = params(company);

        let baseline_sql =
            sql::event_count_baseline(USER_EVENTS_TABLE, &["register"], grid.start());
        let baseline = rollup::scalar_value(&self.store.query(&baseline_sql, &params).await?)?;

        let daily_sql =
            sql::daily_event_count(USER_EVENTS_TABLE, &["register"], grid.start(), grid.end());
        let daily = rollup::daily_values(&self.store.query(&daily_sql, &params).await?)?;

        let series = rollup::cumulative(&grid, baseline, &daily);
        Ok(int_series(&grid, &series))
    }

    /// 7-day event count, sampled daily
    async fn rolling_count(&self, company: &str, types: &[&str]) -> Result<CardPayload> {
        let grid = self.grid();
        let daily_sql =
            sql::daily_event_count(USER_EVENTS_TABLE, types, grid.lookback_start(), grid.end());
        let daily = rollup::daily_values(&self.store.query(&daily_sql, &params(company)).await?)?;

        let series = rollup::rolling_sum(&grid, &daily);
        Ok(int_series(&grid, &series))
    }

    /// 7-day distinct active users, sampled daily
    async fn active_users(&self, company: &str) -> Result<CardPayload> {
        let grid = self.grid();
        let users_sql = sql::daily_active_users(
            USER_EVENTS_TABLE,
            ACTIVITY_TYPES,
            grid.lookback_start(),
            grid.end(),
        );
        let daily = rollup::daily_users(&self.store.query(&users_sql, &params(company)).await?)?;

        let series = rollup::rolling_distinct(&grid, &daily);
        let values: Vec<f64> = series.iter().map(|v| *v as f64).collect();
        Ok(int_series(&grid, &values))
    }

    /// 7-day rating average, sampled daily
    async fn ratings_average(&self, company: &str) -> Result<CardPayload> {
        let grid = self.grid();
        let stats_sql =
            sql::daily_rating_stats(USER_EVENTS_TABLE, grid.lookback_start(), grid.end());
        let stats =
            rollup::daily_rating_stats(&self.store.query(&stats_sql, &params(company)).await?)?;

        let series = rollup::rolling_avg(&grid, &stats);
        let history = grid
            .days()
            .iter()
            .zip(series.iter().copied())
            .map(|(day, value)| {
                HistoryPoint(
                    DayGrid::label(*day),
                    value.map(PointValue::Float).unwrap_or(PointValue::Missing),
                )
            })
            .collect();

        let value = match rollup::last_rating_value(&grid, &stats) {
            Some((avg, num)) => CardValue::Rating { avg, num },
            None => CardValue::RatingMissing,
        };

        Ok(CardPayload::Series(SeriesCard { value, history }))
    }

    /// Calls by type / participants / OS over the most recent 7 days
    async fn calls_breakdown(&self, company: &str) -> Result<CardPayload> {
        let params = params(company);

        let by_type = sql::call_breakdown(
            USER_EVENTS_TABLE,
            "call_type",
            ROLLING_DAYS,
            BreakdownOrder::CountDesc,
        );
        let by_users = sql::call_breakdown(
            USER_EVENTS_TABLE,
            "call_num_users",
            ROLLING_DAYS,
            BreakdownOrder::LabelAsc,
        );
        let by_os = sql::call_breakdown(
            USER_EVENTS_TABLE,
            "call_os",
            ROLLING_DAYS,
            BreakdownOrder::CountDesc,
        );

        let cbt = breakdown_slices(&self.store.query(&by_type, &params).await?)?;
        let cbu = breakdown_slices(&self.store.query(&by_users, &params).await?)?;
        let cbo = breakdown_slices(&self.store.query(&by_os, &params).await?)?;

        Ok(CardPayload::Breakdown(BreakdownCard { cbt, cbu, cbo }))
    }

    /// Latest comments, newest first
    async fn recent_comments(&self, company: &str) -> Result<CardPayload> {
        let comments_sql =
            sql::recent_comments(USER_EVENTS_TABLE, ROLLING_DAYS, RECENT_COMMENTS_LIMIT);
        let result = self.store.query(&comments_sql, &params(company)).await?;

        let comment_idx = result.column_index("comment");
        let user_idx = result.column_index("user");
        let ts_idx = result.column_index("ts");
        let (Some(comment_idx), Some(user_idx), Some(ts_idx)) = (comment_idx, user_idx, ts_idx)
        else {
            if result.is_empty() {
                return Ok(CardPayload::Comments(Vec::new()));
            }
            return Err(AnalyticsError::BadRow("missing comment columns".into()));
        };

        let entries = result
            .rows
            .iter()
            .map(|row| {
                CommentEntry(
                    row[comment_idx].as_str().unwrap_or_default().to_string(),
                    row[user_idx].as_str().unwrap_or_default().to_string(),
                    row[ts_idx].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        Ok(CardPayload::Comments(entries))
    }
}

fn params(company: &str) -> Vec<QueryParam> {
    vec![QueryParam::string("company", company)]
}

/// The no-data envelope for each card shape
fn degraded(card: Card) -> CardPayload {
    match card {
        Card::CallsBreakdown7d => CardPayload::Breakdown(BreakdownCard::default()),
        Card::CommentsRecent7d => CardPayload::Comments(Vec::new()),
        _ => CardPayload::Series(SeriesCard::no_data()),
    }
}

/// Integer-valued series payload; the current value is the last point
fn int_series(grid: &DayGrid, series: &[f64]) -> CardPayload {
    let history = grid
        .days()
        .iter()
        .zip(series)
        .map(|(day, value)| HistoryPoint(DayGrid::label(*day), PointValue::Int(value.round() as i64)))
        .collect();

    let value = series
        .last()
        .map(|v| CardValue::Int(v.round() as i64))
        .unwrap_or(CardValue::Missing);

    CardPayload::Series(SeriesCard { value, history })
}

/// Fraction-valued series payload with `--` for undefined points
fn float_series(grid: &DayGrid, series: &[Option<f64>]) -> CardPayload {
    let history = grid
        .days()
        .iter()
        .zip(series.iter().copied())
        .map(|(day, value)| {
            HistoryPoint(
                DayGrid::label(*day),
                value.map(PointValue::Float).unwrap_or(PointValue::Missing),
            )
        })
        .collect();

    let value = series
        .last()
        .and_then(|v| *v)
        .map(CardValue::Float)
        .unwrap_or(CardValue::Missing);

    CardPayload::Series(SeriesCard { value, history })
}

/// Parse `(label, value)` breakdown rows, stringifying numeric labels
fn breakdown_slices(result: &QueryResult) -> Result<Vec<BreakdownSlice>> {
    if result.is_empty() {
        return Ok(Vec::new());
    }
    let label_idx = result
        .column_index("label")
        .ok_or_else(|| AnalyticsError::BadRow("missing column 'label'".into()))?;
    let value_idx = result
        .column_index("value")
        .ok_or_else(|| AnalyticsError::BadRow("missing column 'value'".into()))?;

    Ok(result
        .rows
        .iter()
        .map(|row| {
            let label = match &row[label_idx] {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let count = row[value_idx].as_i64().unwrap_or(0);
            BreakdownSlice(label, count)
        })
        .collect())
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
