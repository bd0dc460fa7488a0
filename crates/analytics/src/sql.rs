//! SQL builders for card queries
//!
//! Every query is scoped by the `@company` named parameter and a computed
//! date range; table names resolve against the warehouse's default dataset.
//! Aside from the parameter, all query text is assembled from static
//! fragments.

use chrono::NaiveDate;

/// Sort order for breakdown groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownOrder {
    /// Largest group first (call types, operating systems)
    CountDesc,
    /// Natural label order (participant counts)
    LabelAsc,
}

fn date_literal(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

fn type_list(types: &[&str]) -> String {
    types
        .iter()
        .map(|t| format!("'{}'", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-day sum of a counter column (purchased/provisioned totals)
pub fn daily_counter_sum(
    table: &str,
    counter: &str,
    event_type: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    format!(
        "SELECT DATE(timestamp) AS day, SUM({counter}) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type = '{event_type}' \
           AND {counter} IS NOT NULL \
           AND DATE(timestamp) BETWEEN '{start}' AND '{end}' \
         GROUP BY day ORDER BY day",
        start = date_literal(start),
        end = date_literal(end),
    )
}

/// Counter total accumulated strictly before `before` (cumulative baseline)
pub fn counter_baseline(table: &str, counter: &str, event_type: &str, before: NaiveDate) -> String {
    format!(
        "SELECT COALESCE(SUM({counter}), 0) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type = '{event_type}' \
           AND {counter} IS NOT NULL \
           AND DATE(timestamp) < '{before}'",
        before = date_literal(before),
    )
}

/// Counter total over all time (customer overview)
pub fn counter_total(table: &str, counter: &str, event_type: &str) -> String {
    format!(
        "SELECT COALESCE(SUM({counter}), 0) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type = '{event_type}' \
           AND {counter} IS NOT NULL",
    )
}

/// Per-day count of events of the given types
pub fn daily_event_count(table: &str, types: &[&str], start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "SELECT DATE(timestamp) AS day, COUNT(*) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type IN ({types}) \
           AND DATE(timestamp) BETWEEN '{start}' AND '{end}' \
         GROUP BY day ORDER BY day",
        types = type_list(types),
        start = date_literal(start),
        end = date_literal(end),
    )
}

/// Event count accumulated strictly before `before` (cumulative baseline)
pub fn event_count_baseline(table: &str, types: &[&str], before: NaiveDate) -> String {
    format!(
        "SELECT COUNT(*) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type IN ({types}) \
           AND DATE(timestamp) < '{before}'",
        types = type_list(types),
        before = date_literal(before),
    )
}

/// Per-day rating sum and count (for windowed averages)
pub fn daily_rating_stats(table: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "SELECT DATE(timestamp) AS day, SUM(rating) AS total, COUNT(rating) AS num \
         FROM {table} \
         WHERE company = @company \
           AND type = 'rating' \
           AND rating IS NOT NULL \
           AND DATE(timestamp) BETWEEN '{start}' AND '{end}' \
         GROUP BY day ORDER BY day",
        start = date_literal(start),
        end = date_literal(end),
    )
}

/// Distinct (day, user) pairs for activity (for windowed distinct counts)
pub fn daily_active_users(table: &str, types: &[&str], start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "SELECT DISTINCT DATE(timestamp) AS day, user \
         FROM {table} \
         WHERE company = @company \
           AND type IN ({types}) \
           AND DATE(timestamp) BETWEEN '{start}' AND '{end}' \
         ORDER BY day",
        types = type_list(types),
        start = date_literal(start),
        end = date_literal(end),
    )
}

/// Call counts grouped by a categorical field over the most recent N days
pub fn call_breakdown(table: &str, field: &str, days: i64, order: BreakdownOrder) -> String {
    let order_clause = match order {
        BreakdownOrder::CountDesc => "value DESC",
        BreakdownOrder::LabelAsc => "label",
    };
    format!(
        "SELECT {field} AS label, COUNT(*) AS value \
         FROM {table} \
         WHERE company = @company \
           AND type = 'call_started' \
           AND {field} IS NOT NULL \
           AND timestamp >= TIMESTAMP_SUB(CURRENT_TIMESTAMP(), INTERVAL {days} DAY) \
         GROUP BY label ORDER BY {order_clause}",
    )
}

/// Most recent comments, newest first
pub fn recent_comments(table: &str, days: i64, limit: usize) -> String {
    format!(
        "SELECT comment, user, \
                FORMAT_TIMESTAMP('%Y-%m-%dT%H:%M:%SZ', timestamp) AS ts \
         FROM {table} \
         WHERE company = @company \
           AND type = 'comment' \
           AND comment IS NOT NULL \
           AND timestamp >= TIMESTAMP_SUB(CURRENT_TIMESTAMP(), INTERVAL {days} DAY) \
         ORDER BY timestamp DESC LIMIT {limit}",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_counter_sum() {
        let sql = daily_counter_sum(
            "company_events",
            "purchased",
            "purchased",
            date(2024, 6, 1),
            date(2024, 6, 30),
        );
        assert!(sql.contains("SUM(purchased) AS value"));
        assert!(sql.contains("company = @company"));
        assert!(sql.contains("type = 'purchased'"));
        assert!(sql.contains("BETWEEN '2024-06-01' AND '2024-06-30'"));
        assert!(sql.contains("GROUP BY day"));
    }

    #[test]
    fn test_counter_baseline_excludes_window() {
        let sql = counter_baseline("company_events", "provisioned", "provisioned", date(2024, 6, 1));
        assert!(sql.contains("DATE(timestamp) < '2024-06-01'"));
        assert!(sql.contains("COALESCE(SUM(provisioned), 0)"));
    }

    #[test]
    fn test_daily_event_count_multiple_types() {
        let sql = daily_event_count(
            "user_events",
            &["call_started", "dialin"],
            date(2024, 5, 26),
            date(2024, 6, 30),
        );
        assert!(sql.contains("type IN ('call_started', 'dialin')"));
        assert!(sql.contains("COUNT(*) AS value"));
    }

    #[test]
    fn test_daily_active_users_is_distinct() {
        let sql = daily_active_users(
            "user_events",
            &["call_started", "dialin"],
            date(2024, 5, 26),
            date(2024, 6, 30),
        );
        assert!(sql.contains("SELECT DISTINCT DATE(timestamp) AS day, user"));
    }

    #[test]
    fn test_call_breakdown_orders() {
        let by_type = call_breakdown("user_events", "call_type", 7, BreakdownOrder::CountDesc);
        assert!(by_type.contains("ORDER BY value DESC"));
        assert!(by_type.contains("type = 'call_started'"));
        assert!(by_type.contains("INTERVAL 7 DAY"));

        let by_users = call_breakdown("user_events", "call_num_users", 7, BreakdownOrder::LabelAsc);
        assert!(by_users.contains("ORDER BY label"));
    }

    #[test]
    fn test_recent_comments_limit() {
        let sql = recent_comments("user_events", 7, 10);
        assert!(sql.contains("ORDER BY timestamp DESC LIMIT 10"));
        assert!(sql.contains("FORMAT_TIMESTAMP"));
    }
}
