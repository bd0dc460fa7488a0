//! Plan-invariant and write-path tests
//!
//! The plan tests pin the two mandatory generation properties (one-year
//! window, monotonic provisioning) with seeded RNGs; the write tests run
//! the generator against in-memory stores, including a mid-run failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use beacon_config::DemoConfig;
use beacon_docstore::{
    Document, DocumentStore, FieldFilter, JsonMap, SetupReport as DocSetupReport,
};
use beacon_model::CompanyEventKind;
use beacon_warehouse::{
    EventStore, QueryParam, QueryResult, SetupReport as WhSetupReport, WarehouseError,
};

use super::{DemoPlan, Generator};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct MemoryDocstore {
    collections: Mutex<HashMap<String, Vec<JsonMap>>>,
    fail_collection: Option<&'static str>,
}

impl MemoryDocstore {
    fn failing_on(collection: &'static str) -> Self {
        Self {
            fail_collection: Some(collection),
            ..Default::default()
        }
    }

    fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocstore {
    async fn get(
        &self,
        _collection: &str,
        _id: &str,
    ) -> beacon_docstore::Result<Option<Document>> {
        Ok(None)
    }

    async fn put(
        &self,
        collection: &str,
        _id: &str,
        fields: &JsonMap,
    ) -> beacon_docstore::Result<()> {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(fields.clone());
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        _fields: &JsonMap,
    ) -> beacon_docstore::Result<()> {
        Err(beacon_docstore::DocstoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, _collection: &str, _id: &str) -> beacon_docstore::Result<()> {
        Ok(())
    }

    async fn batch_write(
        &self,
        collection: &str,
        docs: &[JsonMap],
    ) -> beacon_docstore::Result<usize> {
        if self.fail_collection == Some(collection) {
            return Err(beacon_docstore::DocstoreError::Execution(format!(
                "simulated failure writing {}",
                collection
            )));
        }
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .extend(docs.iter().cloned());
        Ok(docs.len())
    }

    async fn delete_all(&self, collection: &str) -> beacon_docstore::Result<usize> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .remove(collection)
            .map(|docs| docs.len())
            .unwrap_or(0))
    }

    async fn list(&self, collection: &str, limit: usize) -> beacon_docstore::Result<Vec<Document>> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .take(limit)
                    .enumerate()
                    .map(|(i, fields)| Document {
                        id: i.to_string(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(
        &self,
        collection: &str,
        _filter: Option<&FieldFilter>,
    ) -> beacon_docstore::Result<u64> {
        Ok(self.len(collection) as u64)
    }

    async fn setup(&self) -> beacon_docstore::Result<DocSetupReport> {
        Ok(DocSetupReport {
            created: Vec::new(),
            already_existed: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[derive(Default)]
struct MemoryWarehouse {
    inserted: Mutex<HashMap<String, usize>>,
    truncated: Mutex<Vec<String>>,
}

impl MemoryWarehouse {
    fn inserted(&self, table: &str) -> usize {
        self.inserted.lock().unwrap().get(table).copied().unwrap_or(0)
    }
}

#[async_trait]
impl EventStore for MemoryWarehouse {
    async fn query(
        &self,
        _sql: &str,
        _params: &[QueryParam],
    ) -> beacon_warehouse::Result<QueryResult> {
        Ok(QueryResult::empty())
    }

    async fn insert_rows(
        &self,
        table: &str,
        rows: &[serde_json::Value],
    ) -> beacon_warehouse::Result<usize> {
        *self
            .inserted
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default() += rows.len();
        Ok(rows.len())
    }

    async fn truncate(&self, table: &str) -> beacon_warehouse::Result<()> {
        self.truncated.lock().unwrap().push(table.to_string());
        Ok(())
    }

    async fn setup(&self) -> beacon_warehouse::Result<WhSetupReport> {
        Ok(WhSetupReport {
            created: Vec::new(),
            already_existed: Vec::new(),
        })
    }

    async fn health_check(&self) -> beacon_warehouse::Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct BrokenWarehouse;

#[async_trait]
impl EventStore for BrokenWarehouse {
    async fn query(
        &self,
        _sql: &str,
        _params: &[QueryParam],
    ) -> beacon_warehouse::Result<QueryResult> {
        Ok(QueryResult::empty())
    }

    async fn insert_rows(
        &self,
        _table: &str,
        _rows: &[serde_json::Value],
    ) -> beacon_warehouse::Result<usize> {
        Err(WarehouseError::Connection("warehouse is down".into()))
    }

    async fn truncate(&self, _table: &str) -> beacon_warehouse::Result<()> {
        Err(WarehouseError::Connection("warehouse is down".into()))
    }

    async fn setup(&self) -> beacon_warehouse::Result<WhSetupReport> {
        Err(WarehouseError::Connection("warehouse is down".into()))
    }

    async fn health_check(&self) -> beacon_warehouse::Result<()> {
        Err(WarehouseError::Connection("warehouse is down".into()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

// =============================================================================
// Plan Tests
// =============================================================================

fn plan(seed: u64, users: usize) -> DemoPlan {
    let mut rng = StdRng::seed_from_u64(seed);
    DemoPlan::build(&mut rng, &DemoConfig::default(), users, Utc::now())
}

#[test]
fn test_plan_events_span_exactly_the_one_year_window() {
    let now = Utc::now();
    let window_start = now - Duration::days(365);

    for seed in 0..5 {
        let plan = plan(seed, 40);

        for event in &plan.company_events {
            assert!(event.timestamp >= window_start, "company event too old");
            assert!(event.timestamp <= now + Duration::seconds(1));
        }
        for event in &plan.user_events {
            assert!(event.timestamp >= window_start, "user event too old");
            assert!(event.timestamp <= now + Duration::seconds(1));
        }
    }
}

#[test]
fn test_plan_provisioning_never_outruns_purchases() {
    for seed in 0..5 {
        let plan = plan(seed, 40);

        let mut by_company: HashMap<&str, Vec<_>> = HashMap::new();
        for event in &plan.company_events {
            by_company.entry(event.company.as_str()).or_default().push(event);
        }

        for (company, mut events) in by_company {
            events.sort_by_key(|e| e.timestamp);
            let mut purchased = 0i64;
            let mut provisioned = 0i64;
            for event in events {
                match event.kind {
                    CompanyEventKind::Purchased => purchased += event.purchased.unwrap_or(0),
                    CompanyEventKind::Provisioned => provisioned += event.provisioned.unwrap_or(0),
                }
                assert!(provisioned <= purchased, "{} outran purchases", company);
            }
        }
    }
}

#[test]
fn test_plan_respects_the_user_limit_and_derives_companies() {
    let plan = plan(1, 50);

    assert_eq!(plan.users.len(), 50);
    assert!(!plan.companies.is_empty());

    // Every user's company has a company document, and vice versa
    for user in &plan.users {
        assert!(plan.companies.iter().any(|c| c.name == user.company));
    }
    for company in &plan.companies {
        assert!(plan.users.iter().any(|u| u.company == company.name));
    }
}

#[test]
fn test_plan_renewals_price_from_purchase_totals() {
    let plan = plan(2, 30);

    for renewal in &plan.renewals {
        let total: i64 = plan
            .company_events
            .iter()
            .filter(|e| e.company == renewal.company && e.kind == CompanyEventKind::Purchased)
            .map(|e| e.purchased.unwrap_or(0))
            .sum();
        assert_eq!(renewal.amount, total * 2499);
        assert!((10..=100).contains(&renewal.health));
        assert!(renewal.due > Utc::now());
    }
}

#[test]
fn test_plan_gives_every_company_an_upcoming_project() {
    let now = Utc::now();
    let plan = plan(3, 40);

    for company in &plan.companies {
        let future = plan
            .projects
            .iter()
            .filter(|p| p.company == company.name && p.date > now)
            .count();
        assert!(future >= 1, "{} has no upcoming project", company.name);
    }
}

#[test]
fn test_plan_trending_covers_each_company_and_metric() {
    let cfg = DemoConfig::default();
    let plan = plan(4, 24);

    // 30-day period at 7-day intervals = 5 points per metric
    let points_per_metric = 5;
    assert_eq!(
        plan.trending.len(),
        plan.companies.len() * cfg.trending_metrics_count * points_per_metric
    );
}

#[test]
fn test_zero_user_plan_is_empty() {
    let plan = plan(5, 0);
    assert!(plan.users.is_empty());
    assert!(plan.companies.is_empty());
    assert!(plan.company_events.is_empty());
    assert!(plan.user_events.is_empty());
}

// =============================================================================
// Write Tests
// =============================================================================

#[tokio::test]
async fn test_write_plan_fills_both_stores_and_reports_stats() {
    let warehouse = Arc::new(MemoryWarehouse::default());
    let docstore = Arc::new(MemoryDocstore::default());
    let generator = Generator::new(warehouse.clone(), docstore.clone(), DemoConfig::default());

    let plan = plan(6, 25);
    let stats = generator.write_plan(&plan).await.unwrap();

    assert_eq!(stats.users, 25);
    assert_eq!(stats.companies, plan.companies.len());
    assert_eq!(stats.projects, plan.projects.len());
    assert_eq!(stats.trending_entries, plan.trending.len());
    assert_eq!(stats.renewals, plan.renewals.len());
    assert_eq!(stats.company_events, plan.company_events.len());
    assert_eq!(stats.user_events, plan.user_events.len());

    assert_eq!(docstore.len("users"), 25);
    assert_eq!(docstore.len("renewals"), plan.renewals.len());
    assert_eq!(warehouse.inserted("company_events"), plan.company_events.len());
    assert_eq!(warehouse.inserted("user_events"), plan.user_events.len());

    let truncated = warehouse.truncated.lock().unwrap().clone();
    assert_eq!(truncated, vec!["company_events", "user_events"]);
}

#[tokio::test]
async fn test_docstore_failure_reports_partial_stats() {
    let warehouse = Arc::new(MemoryWarehouse::default());
    let docstore = Arc::new(MemoryDocstore::failing_on("projects"));
    let generator = Generator::new(warehouse, docstore, DemoConfig::default());

    let err = generator.write_plan(&plan(7, 20)).await.unwrap_err();

    assert_eq!(err.stage, "projects");
    // Earlier stages completed and are reported
    assert_eq!(err.partial.users, 20);
    assert!(err.partial.companies > 0);
    // The failed stage and everything after it did not
    assert_eq!(err.partial.projects, 0);
    assert_eq!(err.partial.user_events, 0);
}

#[tokio::test]
async fn test_warehouse_failure_reports_partial_stats() {
    let warehouse = Arc::new(BrokenWarehouse);
    let docstore = Arc::new(MemoryDocstore::default());
    let generator = Generator::new(warehouse, docstore, DemoConfig::default());

    let err = generator.write_plan(&plan(8, 20)).await.unwrap_err();

    // First warehouse touch is the company_events truncate
    assert_eq!(err.stage, "company_events");
    assert_eq!(err.partial.users, 20);
    assert!(err.partial.trending_entries > 0);
    assert_eq!(err.partial.company_events, 0);
}
