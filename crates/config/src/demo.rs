//! Demo-data generation settings

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Knobs for the synthetic-data generator
///
/// The defaults produce a plausible mid-size customer base; the batch sizes
/// bound request payloads against the stores' per-request limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Rows per warehouse streaming-insert request
    /// Default: 500
    pub warehouse_batch_size: usize,

    /// Documents per document-store batch write (hard API limit is 500)
    /// Default: 500
    pub docstore_batch_size: usize,

    /// Users generated when no limit is supplied
    /// Default: 100
    pub default_user_limit: usize,

    /// Projects created per company (inclusive range)
    pub min_projects_per_company: usize,
    pub max_projects_per_company: usize,

    /// Trending metrics tracked per company
    pub trending_metrics_count: usize,

    /// Days between trending data points
    pub trending_interval_days: i64,

    /// Days of trending history
    pub trending_period_days: i64,

    /// Renewal due date offset from now (inclusive range, days)
    pub min_renewal_days: i64,
    pub max_renewal_days: i64,

    /// Max random delay applied to registration instants (minutes)
    pub max_reg_delay_minutes: i64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            warehouse_batch_size: 500,
            docstore_batch_size: 500,
            default_user_limit: 100,
            min_projects_per_company: 1,
            max_projects_per_company: 3,
            trending_metrics_count: 3,
            trending_interval_days: 7,
            trending_period_days: 30,
            min_renewal_days: 30,
            max_renewal_days: 120,
            max_reg_delay_minutes: 120,
        }
    }
}

impl DemoConfig {
    /// Validate ranges and limits
    pub fn validate(&self) -> Result<()> {
        if self.warehouse_batch_size == 0 {
            return Err(ConfigError::invalid(
                "demo.warehouse_batch_size",
                "must be nonzero",
            ));
        }
        if self.docstore_batch_size == 0 || self.docstore_batch_size > 500 {
            return Err(ConfigError::invalid(
                "demo.docstore_batch_size",
                "must be in 1..=500",
            ));
        }
        if self.min_projects_per_company > self.max_projects_per_company {
            return Err(ConfigError::invalid(
                "demo.min_projects_per_company",
                "exceeds max_projects_per_company",
            ));
        }
        if self.min_renewal_days > self.max_renewal_days {
            return Err(ConfigError::invalid(
                "demo.min_renewal_days",
                "exceeds max_renewal_days",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        DemoConfig::default().validate().unwrap();
    }

    #[test]
    fn test_batch_size_limits() {
        let config: DemoConfig = toml::from_str("docstore_batch_size = 1000").unwrap();
        assert!(config.validate().is_err());

        let config: DemoConfig = toml::from_str("warehouse_batch_size = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config: DemoConfig =
            toml::from_str("min_renewal_days = 200\nmax_renewal_days = 100").unwrap();
        assert!(config.validate().is_err());
    }
}
