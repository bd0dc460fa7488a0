//! Demo-data planning and writing
//!
//! `DemoPlan::build` synthesizes the entire dataset up front as a pure
//! function of an injected RNG, so the mandatory properties are checkable
//! without touching a store. `Generator` then purges and rewrites the
//! stores collection by collection, carrying running stats so a failure
//! partway reports exactly what was written.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use beacon_config::DemoConfig;
use beacon_docstore::{DocumentStore, JsonMap};
use beacon_model::{
    CompanyEvent, CompanyEventKind, UserEvent, ACV_PER_DEVICE, COMPANY_EVENTS_TABLE,
    USER_EVENTS_TABLE,
};
use beacon_warehouse::EventStore;

use crate::events::{build_company_events, build_user_events, UserProfile};
use crate::shape::event_instant;
use crate::vocab::{company_domain, COMPANIES, FIRST_NAMES, LAST_NAMES, PROJECT_NAMES, TRENDING_METRICS};

/// Length of the generated historical window
const WINDOW_DAYS: i64 = 365;

/// Days after a company's first registration before projects start
const PROJECT_START_DELAY_DAYS: i64 = 90;

/// Counts of every entity type created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub users: usize,
    pub companies: usize,
    pub projects: usize,
    pub trending_entries: usize,
    pub renewals: usize,
    pub company_events: usize,
    pub user_events: usize,
}

/// A generation failure, carrying what had been written before it
#[derive(Debug, Error)]
#[error("demo generation failed at {stage}: {message}")]
pub struct GenerateError {
    /// Stage that failed (collection or table name)
    pub stage: &'static str,
    /// Store error message
    pub message: String,
    /// Stats accumulated before the failure
    pub partial: GenerationStats,
}

// =============================================================================
// Plan
// =============================================================================

/// Company metadata document
#[derive(Debug, Clone)]
pub struct CompanyDoc {
    pub name: String,
    pub earliest_reg: DateTime<Utc>,
}

/// Engagement project document
#[derive(Debug, Clone)]
pub struct ProjectDoc {
    pub name: String,
    pub company: String,
    pub date: DateTime<Utc>,
}

/// Trending metric data point
#[derive(Debug, Clone)]
pub struct TrendingDoc {
    pub metric: String,
    pub company: String,
    pub value: f64,
    pub date: DateTime<Utc>,
}

/// Renewal document
#[derive(Debug, Clone)]
pub struct RenewalDoc {
    pub company: String,
    pub amount: i64,
    pub health: i64,
    pub due: DateTime<Utc>,
}

/// The full synthetic dataset, before any store writes
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub users: Vec<UserProfile>,
    pub companies: Vec<CompanyDoc>,
    pub projects: Vec<ProjectDoc>,
    pub trending: Vec<TrendingDoc>,
    pub renewals: Vec<RenewalDoc>,
    pub company_events: Vec<CompanyEvent>,
    pub user_events: Vec<UserEvent>,
}

impl DemoPlan {
    /// Synthesize a dataset of up to `user_limit` users ending at `now`
    pub fn build(
        rng: &mut impl Rng,
        cfg: &DemoConfig,
        user_limit: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let window_start = now - Duration::days(WINDOW_DAYS);

        // Draw a company roster sized to the user count, and anchor each
        // company's story early in the window
        let company_count = (user_limit / 8 + 1).clamp(1, COMPANIES.len());
        let roster = &COMPANIES[..company_count];
        let anchors: BTreeMap<&str, DateTime<Utc>> = roster
            .iter()
            .map(|company| {
                let day = (now - Duration::days(rng.gen_range(300..=360))).date_naive();
                (*company, event_instant(rng, day).max(window_start))
            })
            .collect();

        // Users spread across the roster, registering after their
        // company's anchor
        let mut users = Vec::with_capacity(user_limit);
        for i in 0..user_limit {
            let company = *roster.choose(rng).unwrap_or(&COMPANIES[0]);
            let anchor = anchors[company];
            let tenure_days = (now - anchor).num_days().saturating_sub(30).max(1);

            let reg_day = (anchor + Duration::days(rng.gen_range(0..=tenure_days))).date_naive();
            let reg_date = (event_instant(rng, reg_day)
                - Duration::minutes(rng.gen_range(0..=cfg.max_reg_delay_minutes)))
            .clamp(anchor, now);

            let first = FIRST_NAMES.choose(rng).unwrap_or(&"Ava").to_lowercase();
            let last = LAST_NAMES.choose(rng).unwrap_or(&"Abbott").to_lowercase();
            users.push(UserProfile {
                email: format!("{}.{}{}@{}", first, last, i, company_domain(company)),
                company: company.to_string(),
                reg_date,
            });
        }

        // Companies derive from the users that actually landed on them
        let mut earliest: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();
        for user in &users {
            earliest
                .entry(user.company.clone())
                .and_modify(|reg| *reg = (*reg).min(user.reg_date))
                .or_insert(user.reg_date);
        }
        let companies: Vec<CompanyDoc> = earliest
            .into_iter()
            .map(|(name, earliest_reg)| CompanyDoc { name, earliest_reg })
            .collect();

        let company_events: Vec<CompanyEvent> = companies
            .iter()
            .flat_map(|company| {
                build_company_events(rng, &company.name, company.earliest_reg, now)
            })
            .collect();

        let projects = build_projects(rng, cfg, &companies, now);
        let trending = build_trending(rng, cfg, &companies, now);
        let renewals = build_renewals(rng, cfg, &company_events, now);

        let user_events: Vec<UserEvent> = users
            .iter()
            .flat_map(|user| build_user_events(rng, user, now))
            .collect();

        Self {
            users,
            companies,
            projects,
            trending,
            renewals,
            company_events,
            user_events,
        }
    }
}

/// Projects spread over each company's engagement period, with at least one
/// in the future
fn build_projects(
    rng: &mut impl Rng,
    cfg: &DemoConfig,
    companies: &[CompanyDoc],
    now: DateTime<Utc>,
) -> Vec<ProjectDoc> {
    let mut projects = Vec::new();

    for company in companies {
        let period_start = company.earliest_reg + Duration::days(PROJECT_START_DELAY_DAYS);
        let period_end = now + Duration::days(30);
        if period_start >= period_end {
            continue;
        }
        let period_days = (period_end - period_start).num_days().max(1);

        let count = rng.gen_range(cfg.min_projects_per_company..=cfg.max_projects_per_company);
        if count == 0 {
            continue;
        }

        let interval = period_days as f64 / count as f64;
        let mut dates = Vec::with_capacity(count);
        for i in 0..count {
            let jitter_range = (interval * 0.25).max(1.0) as i64;
            let jitter = rng.gen_range(-jitter_range..=jitter_range);
            let day = ((i as f64 * interval) as i64 + jitter).clamp(0, period_days - 1);
            dates.push(period_start + Duration::days(day));
        }

        // Keep the dashboard's "upcoming" panel populated
        if !dates.iter().any(|d| *d > now) {
            let future_days = (period_end - now).num_days().max(2);
            if let Some(last) = dates.last_mut() {
                *last = now + Duration::days(rng.gen_range(1..future_days));
            }
        }

        for date in dates {
            projects.push(ProjectDoc {
                name: PROJECT_NAMES.choose(rng).unwrap_or(&"Pilot").to_string(),
                company: company.name.clone(),
                date,
            });
        }
    }

    projects
}

/// Recent history for the first few trending metrics
fn build_trending(
    rng: &mut impl Rng,
    cfg: &DemoConfig,
    companies: &[CompanyDoc],
    now: DateTime<Utc>,
) -> Vec<TrendingDoc> {
    let metric_count = cfg.trending_metrics_count.min(TRENDING_METRICS.len());
    let mut trending = Vec::new();

    for company in companies {
        for metric in &TRENDING_METRICS[..metric_count] {
            let mut offset = 0;
            while offset < cfg.trending_period_days {
                let value: f64 = rng.gen_range(10.0..100.0);
                trending.push(TrendingDoc {
                    metric: metric.to_string(),
                    company: company.name.clone(),
                    value: (value * 100.0).round() / 100.0,
                    date: now - Duration::days(offset),
                });
                offset += cfg.trending_interval_days.max(1);
            }
        }
    }

    trending
}

/// One renewal per company, priced from its purchase total
fn build_renewals(
    rng: &mut impl Rng,
    cfg: &DemoConfig,
    company_events: &[CompanyEvent],
    now: DateTime<Utc>,
) -> Vec<RenewalDoc> {
    let mut purchased: BTreeMap<&str, i64> = BTreeMap::new();
    for event in company_events {
        if event.kind == CompanyEventKind::Purchased {
            *purchased.entry(event.company.as_str()).or_default() +=
                event.purchased.unwrap_or(0);
        }
    }

    purchased
        .into_iter()
        .map(|(company, total)| {
            // Most customers healthy, a tail at risk
            let health = match rng.gen_range(0..=5) {
                0 => rng.gen_range(10..=30),
                1 | 2 => rng.gen_range(30..=60),
                _ => rng.gen_range(60..=100),
            };

            RenewalDoc {
                company: company.to_string(),
                amount: total * ACV_PER_DEVICE,
                health,
                due: now + Duration::days(rng.gen_range(cfg.min_renewal_days..=cfg.max_renewal_days)),
            }
        })
        .collect()
}

// =============================================================================
// Writing
// =============================================================================

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn doc(pairs: Vec<(&str, serde_json::Value)>) -> JsonMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Writes a [`DemoPlan`] to the stores
pub struct Generator {
    warehouse: std::sync::Arc<dyn EventStore>,
    docstore: std::sync::Arc<dyn DocumentStore>,
    cfg: DemoConfig,
}

impl Generator {
    /// Create a generator over the two stores
    pub fn new(
        warehouse: std::sync::Arc<dyn EventStore>,
        docstore: std::sync::Arc<dyn DocumentStore>,
        cfg: DemoConfig,
    ) -> Self {
        Self {
            warehouse,
            docstore,
            cfg,
        }
    }

    /// Plan and write a full demo dataset
    pub async fn generate(
        &self,
        user_limit: Option<usize>,
    ) -> std::result::Result<GenerationStats, GenerateError> {
        let user_limit = user_limit.unwrap_or(self.cfg.default_user_limit);
        tracing::info!(user_limit, "starting demo data generation");

        let plan = DemoPlan::build(&mut rand::thread_rng(), &self.cfg, user_limit, Utc::now());
        self.write_plan(&plan).await
    }

    /// Write an already-built plan, reporting partial stats on failure
    pub async fn write_plan(
        &self,
        plan: &DemoPlan,
    ) -> std::result::Result<GenerationStats, GenerateError> {
        let mut stats = GenerationStats::default();

        let users: Vec<JsonMap> = plan
            .users
            .iter()
            .map(|u| {
                doc(vec![
                    ("email", json!(u.email)),
                    ("company", json!(u.company)),
                    ("reg_date", json!(rfc3339(u.reg_date))),
                ])
            })
            .collect();
        stats.users = self.replace_collection("users", &users, &stats).await?;

        let companies: Vec<JsonMap> = plan
            .companies
            .iter()
            .map(|c| {
                doc(vec![
                    ("name", json!(c.name)),
                    ("earliest_reg", json!(rfc3339(c.earliest_reg))),
                ])
            })
            .collect();
        stats.companies = self.replace_collection("companies", &companies, &stats).await?;

        let projects: Vec<JsonMap> = plan
            .projects
            .iter()
            .map(|p| {
                doc(vec![
                    ("name", json!(p.name)),
                    ("company", json!(p.company)),
                    ("date", json!(rfc3339(p.date))),
                ])
            })
            .collect();
        stats.projects = self.replace_collection("projects", &projects, &stats).await?;

        let trending: Vec<JsonMap> = plan
            .trending
            .iter()
            .map(|t| {
                doc(vec![
                    ("metric", json!(t.metric)),
                    ("company", json!(t.company)),
                    ("value", json!(t.value)),
                    ("date", json!(rfc3339(t.date))),
                ])
            })
            .collect();
        stats.trending_entries = self.replace_collection("trending", &trending, &stats).await?;

        // Warehouse load: clear both tables, then stream the events
        for table in [COMPANY_EVENTS_TABLE, USER_EVENTS_TABLE] {
            self.warehouse
                .truncate(table)
                .await
                .map_err(|e| stage_error(table, e, &stats))?;
        }

        stats.company_events = self
            .insert_events(COMPANY_EVENTS_TABLE, &to_rows(&plan.company_events), &stats)
            .await?;

        let renewals: Vec<JsonMap> = plan
            .renewals
            .iter()
            .map(|r| {
                doc(vec![
                    ("company", json!(r.company)),
                    ("amount", json!(r.amount)),
                    ("health", json!(r.health)),
                    ("due", json!(rfc3339(r.due))),
                ])
            })
            .collect();
        stats.renewals = self.replace_collection("renewals", &renewals, &stats).await?;

        stats.user_events = self
            .insert_events(USER_EVENTS_TABLE, &to_rows(&plan.user_events), &stats)
            .await?;

        tracing::info!(
            users = stats.users,
            companies = stats.companies,
            company_events = stats.company_events,
            user_events = stats.user_events,
            "demo data generation complete"
        );

        Ok(stats)
    }

    async fn replace_collection(
        &self,
        collection: &'static str,
        docs: &[JsonMap],
        stats: &GenerationStats,
    ) -> std::result::Result<usize, GenerateError> {
        let deleted = self
            .docstore
            .delete_all(collection)
            .await
            .map_err(|e| stage_error(collection, e, stats))?;
        if deleted > 0 {
            tracing::debug!(collection, deleted, "cleared existing documents");
        }

        self.docstore
            .batch_write(collection, docs)
            .await
            .map_err(|e| stage_error(collection, e, stats))
    }

    async fn insert_events(
        &self,
        table: &'static str,
        rows: &[serde_json::Value],
        stats: &GenerationStats,
    ) -> std::result::Result<usize, GenerateError> {
        self.warehouse
            .insert_rows(table, rows)
            .await
            .map_err(|e| stage_error(table, e, stats))
    }
}

fn to_rows<T: Serialize>(events: &[T]) -> Vec<serde_json::Value> {
    events
        .iter()
        .filter_map(|e| serde_json::to_value(e).ok())
        .collect()
}

fn stage_error(
    stage: &'static str,
    err: impl std::fmt::Display,
    stats: &GenerationStats,
) -> GenerateError {
    tracing::error!(stage, error = %err, "demo generation failed");
    GenerateError {
        stage,
        message: err.to_string(),
        partial: stats.clone(),
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod generator_test;
