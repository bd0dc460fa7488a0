//! Engine tests against fake stores
//!
//! The fake returns canned query results in call order, which is stable per
//! card; the failing store exercises the degrade-to-sentinel path.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};

use beacon_warehouse::{
    Column, DataType, EventStore, QueryParam, QueryResult, SetupReport, WarehouseError,
};

use super::CardEngine;
use crate::card::Card;
use crate::payload::{CardPayload, CardValue, PointValue};
use crate::timegrid::DayGrid;

// =============================================================================
// Fakes
// =============================================================================

struct FakeStore {
    responses: Mutex<VecDeque<QueryResult>>,
    queries: Mutex<Vec<String>>,
}

impl FakeStore {
    fn with_responses(responses: Vec<QueryResult>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventStore for FakeStore {
    async fn query(
        &self,
        sql: &str,
        params: &[QueryParam],
    ) -> beacon_warehouse::Result<QueryResult> {
        assert_eq!(
            params,
            &[QueryParam::string("company", "Initech")],
            "every card query must be company-scoped"
        );
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(QueryResult::empty))
    }

    async fn insert_rows(&self, _table: &str, rows: &[Value]) -> beacon_warehouse::Result<usize> {
        Ok(rows.len())
    }

    async fn truncate(&self, _table: &str) -> beacon_warehouse::Result<()> {
        Ok(())
    }

    async fn setup(&self) -> beacon_warehouse::Result<SetupReport> {
        Ok(SetupReport {
            created: Vec::new(),
            already_existed: Vec::new(),
        })
    }

    async fn health_check(&self) -> beacon_warehouse::Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FailStore;

#[async_trait]
impl EventStore for FailStore {
    async fn query(
        &self,
        _sql: &str,
        _params: &[QueryParam],
    ) -> beacon_warehouse::Result<QueryResult> {
        Err(WarehouseError::Connection("store is down".into()))
    }

    async fn insert_rows(&self, _table: &str, _rows: &[Value]) -> beacon_warehouse::Result<usize> {
        Err(WarehouseError::Connection("store is down".into()))
    }

    async fn truncate(&self, _table: &str) -> beacon_warehouse::Result<()> {
        Err(WarehouseError::Connection("store is down".into()))
    }

    async fn setup(&self) -> beacon_warehouse::Result<SetupReport> {
        Err(WarehouseError::Connection("store is down".into()))
    }

    async fn health_check(&self) -> beacon_warehouse::Result<()> {
        Err(WarehouseError::Connection("store is down".into()))
    }

    fn name(&self) -> &'static str {
        "fail"
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_ago(n: i64) -> String {
    (today() - Duration::days(n)).format("%Y-%m-%d").to_string()
}

fn result(columns: &[(&str, DataType)], rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult::new(
        columns
            .iter()
            .map(|(name, dtype)| Column::new(*name, *dtype))
            .collect(),
        rows,
        0,
    )
}

fn scalar(value: i64) -> QueryResult {
    result(&[("value", DataType::Int64)], vec![vec![json!(value)]])
}

fn series_card(payload: CardPayload) -> crate::payload::SeriesCard {
    match payload {
        CardPayload::Series(card) => card,
        other => panic!("expected series payload, got {:?}", other),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_card_id_is_an_error() {
    let engine = CardEngine::new(FakeStore::with_responses(Vec::new()));
    let err = engine.compute_card("sales_forecast", "Initech").await.unwrap_err();
    assert!(matches!(err, crate::AnalyticsError::UnknownCard(_)));
}

#[tokio::test]
async fn test_every_known_card_id_parses_and_computes() {
    for card in Card::ALL {
        let engine = CardEngine::new(FakeStore::with_responses(Vec::new()));
        // Empty results are fine; the payload shape must still match
        engine.compute_card(card.id(), "Initech").await.unwrap();
    }
}

#[tokio::test]
async fn test_cumulative_card_builds_running_total() {
    let daily = result(
        &[("day", DataType::Date), ("value", DataType::Int64)],
        vec![
            vec![json!(days_ago(29)), json!(5)],
            vec![json!(days_ago(1)), json!(3)],
        ],
    );
    let store = FakeStore::with_responses(vec![scalar(10), daily]);
    let engine = CardEngine::new(store.clone());

    let card = series_card(
        engine
            .compute_card("boxes_purchased_cumulative_30d", "Initech")
            .await
            .unwrap(),
    );

    assert_eq!(card.history.len(), 30);
    assert_eq!(card.history[0].1, PointValue::Int(15)); // baseline + first day
    assert_eq!(card.history[27].1, PointValue::Int(15));
    assert_eq!(card.history[28].1, PointValue::Int(18));
    assert_eq!(card.history[29].1, PointValue::Int(18));
    assert_eq!(card.value, CardValue::Int(18));

    // Non-decreasing throughout
    let values: Vec<i64> = card
        .history
        .iter()
        .map(|p| match p.1 {
            PointValue::Int(v) => v,
            _ => panic!("cumulative history must be integers"),
        })
        .collect();
    assert!(values.windows(2).all(|w| w[1] >= w[0]));

    // Two queries: pre-window baseline, then in-window daily buckets
    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].contains("DATE(timestamp) <"));
    assert!(queries[1].contains("GROUP BY day"));
}

#[tokio::test]
async fn test_history_is_dense_chronological_and_ends_today() {
    let store = FakeStore::with_responses(Vec::new());
    let engine = CardEngine::new(store);

    let card = series_card(
        engine
            .compute_card("calls_count_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );

    assert_eq!(card.history.len(), 30);
    let expected_labels: Vec<String> = DayGrid::trailing(today(), 30)
        .days()
        .iter()
        .map(|d| DayGrid::label(*d))
        .collect();
    let labels: Vec<String> = card.history.iter().map(|p| p.0.clone()).collect();
    assert_eq!(labels, expected_labels);
    assert_eq!(labels.last().unwrap(), &DayGrid::label(today()));
}

#[tokio::test]
async fn test_rolling_count_zero_fills_empty_windows() {
    let engine = CardEngine::new(FakeStore::with_responses(Vec::new()));

    let card = series_card(
        engine
            .compute_card("support_tickets_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );

    assert_eq!(card.value, CardValue::Int(0));
    assert!(card.history.iter().all(|p| p.1 == PointValue::Int(0)));
}

#[tokio::test]
async fn test_provisioned_pct_with_no_devices_is_all_sentinel() {
    // purchased baseline, purchased daily, provisioned baseline,
    // provisioned daily - all empty
    let engine = CardEngine::new(FakeStore::with_responses(Vec::new()));

    let card = series_card(
        engine
            .compute_card("boxes_provisioned_pct_cumulative_30d", "Initech")
            .await
            .unwrap(),
    );

    assert_eq!(card.value, CardValue::Missing);
    assert_eq!(card.history.len(), 30);
    assert!(card.history.iter().all(|p| p.1 == PointValue::Missing));
}

#[tokio::test]
async fn test_provisioned_pct_computes_ratio_per_day() {
    let purchased_daily = result(
        &[("day", DataType::Date), ("value", DataType::Int64)],
        vec![vec![json!(days_ago(29)), json!(10)]],
    );
    let provisioned_daily = result(
        &[("day", DataType::Date), ("value", DataType::Int64)],
        vec![vec![json!(days_ago(20)), json!(5)]],
    );
    let store = FakeStore::with_responses(vec![
        scalar(0),
        purchased_daily,
        scalar(0),
        provisioned_daily,
    ]);
    let engine = CardEngine::new(store);

    let card = series_card(
        engine
            .compute_card("boxes_provisioned_pct_cumulative_30d", "Initech")
            .await
            .unwrap(),
    );

    // Before any provisioning: 0%; after: 50%
    assert_eq!(card.history[0].1, PointValue::Float(0.0));
    assert_eq!(card.history[9].1, PointValue::Float(50.0));
    assert_eq!(card.history[29].1, PointValue::Float(50.0));
    assert_eq!(card.value, CardValue::Float(50.0));
}

#[tokio::test]
async fn test_single_rating_ten_days_ago() {
    let stats = result(
        &[
            ("day", DataType::Date),
            ("total", DataType::Int64),
            ("num", DataType::Int64),
        ],
        vec![vec![json!(days_ago(10)), json!(5), json!(1)]],
    );
    let engine = CardEngine::new(FakeStore::with_responses(vec![stats]));

    let card = series_card(
        engine
            .compute_card("ratings_average_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );

    // Current value comes from the last window that contained the rating
    assert_eq!(card.value, CardValue::Rating { avg: 5.0, num: 1 });

    // Windows ending 10 through 4 days ago contain the rating; others don't
    for (i, point) in card.history.iter().enumerate() {
        let days_back = 29 - i as i64;
        if (4..=10).contains(&days_back) {
            assert_eq!(point.1, PointValue::Float(5.0), "{} days back", days_back);
        } else {
            assert_eq!(point.1, PointValue::Missing, "{} days back", days_back);
        }
    }
}

#[tokio::test]
async fn test_ratings_with_no_data_report_sentinel_value() {
    let engine = CardEngine::new(FakeStore::with_responses(Vec::new()));

    let card = series_card(
        engine
            .compute_card("ratings_average_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );

    assert_eq!(card.value, CardValue::RatingMissing);
    assert!(card.history.iter().all(|p| p.1 == PointValue::Missing));
}

#[tokio::test]
async fn test_active_users_counts_distinct_over_window() {
    let users = result(
        &[("day", DataType::Date), ("user", DataType::String)],
        vec![
            vec![json!(days_ago(3)), json!("a@initech.com")],
            vec![json!(days_ago(2)), json!("a@initech.com")],
            vec![json!(days_ago(20)), json!("b@initech.com")],
        ],
    );
    let engine = CardEngine::new(FakeStore::with_responses(vec![users]));

    let card = series_card(
        engine
            .compute_card("users_active_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );

    // The same user on two days is one active user
    assert_eq!(card.value, CardValue::Int(1));
    // Windows ending 20 through 14 days ago catch the other user
    assert_eq!(card.history[9].1, PointValue::Int(1));
    assert_eq!(card.history[15].1, PointValue::Int(1));
    // A window touching neither (12 days back) is zero
    assert_eq!(card.history[17].1, PointValue::Int(0));
}

#[tokio::test]
async fn test_calls_breakdown_maps_three_dimensions() {
    let by_type = result(
        &[("label", DataType::String), ("value", DataType::Int64)],
        vec![
            vec![json!("Web"), json!(10)],
            vec![json!("Presentation"), json!(4)],
        ],
    );
    let by_users = result(
        &[("label", DataType::Int64), ("value", DataType::Int64)],
        vec![vec![json!(2), json!(9)], vec![json!(3), json!(5)]],
    );
    let by_os = result(
        &[("label", DataType::String), ("value", DataType::Int64)],
        vec![vec![json!("Linux"), json!(14)]],
    );
    let engine = CardEngine::new(FakeStore::with_responses(vec![by_type, by_users, by_os]));

    let payload = engine
        .compute_card("calls_breakdown_7d", "Initech")
        .await
        .unwrap();
    let CardPayload::Breakdown(card) = payload else {
        panic!("expected breakdown payload");
    };

    assert_eq!(card.cbt.len(), 2);
    assert_eq!(card.cbt[0].0, "Web");
    assert_eq!(card.cbt[0].1, 10);

    // Numeric participant-count labels are stringified
    assert_eq!(card.cbu[0].0, "2");
    assert_eq!(card.cbu[1].0, "3");

    // Each dimension's groups sum to the same qualifying-call total
    let total = |slices: &[crate::payload::BreakdownSlice]| -> i64 {
        slices.iter().map(|s| s.1).sum()
    };
    assert_eq!(total(&card.cbt), 14);
    assert_eq!(total(&card.cbu), 14);
    assert_eq!(total(&card.cbo), 14);
}

#[tokio::test]
async fn test_recent_comments_pass_through_newest_first() {
    let comments = result(
        &[
            ("comment", DataType::String),
            ("user", DataType::String),
            ("ts", DataType::String),
        ],
        vec![
            vec![
                json!("Great!"),
                json!("a@initech.com"),
                json!("2024-06-28T10:00:00Z"),
            ],
            vec![
                json!("Video dropouts"),
                json!("b@initech.com"),
                json!("2024-06-27T09:00:00Z"),
            ],
        ],
    );
    let engine = CardEngine::new(FakeStore::with_responses(vec![comments]));

    let payload = engine
        .compute_card("comments_recent_7d", "Initech")
        .await
        .unwrap();
    let CardPayload::Comments(entries) = payload else {
        panic!("expected comments payload");
    };

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "Great!");
    assert_eq!(entries[1].1, "b@initech.com");
}

#[tokio::test]
async fn test_store_failure_degrades_instead_of_erroring() {
    let engine = CardEngine::new(Arc::new(FailStore));

    // Series cards degrade to the no-data envelope
    let card = series_card(
        engine
            .compute_card("calls_count_7d_window_30d", "Initech")
            .await
            .unwrap(),
    );
    assert_eq!(card.value, CardValue::Missing);
    assert!(card.history.is_empty());

    // Breakdown and comments degrade to their empty shapes
    let payload = engine
        .compute_card("calls_breakdown_7d", "Initech")
        .await
        .unwrap();
    assert!(matches!(payload, CardPayload::Breakdown(b) if b.cbt.is_empty()));

    let payload = engine
        .compute_card("comments_recent_7d", "Initech")
        .await
        .unwrap();
    assert!(matches!(payload, CardPayload::Comments(c) if c.is_empty()));
}

#[tokio::test]
async fn test_overview_reports_acv_and_degrades_to_zero() {
    let engine = CardEngine::new(FakeStore::with_responses(vec![scalar(12)]));
    let overview = engine.overview("Initech").await;
    assert_eq!(overview.purchased, 12);
    assert_eq!(overview.acv, 12 * 2499);

    let engine = CardEngine::new(Arc::new(FailStore));
    let overview = engine.overview("Initech").await;
    assert_eq!(overview.purchased, 0);
    assert_eq!(overview.acv, 0);
}
