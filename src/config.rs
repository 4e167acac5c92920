//! Forecast run configuration
//!
//! Every field has a serde default so a partial JSON file only overrides what
//! it names.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Net outflow above which a deficit period is reported as a warning
pub const DEFAULT_DEFICIT_THRESHOLD: f64 = 5000.0;

/// Maximum number of periods a single run may generate
pub const DEFAULT_MAX_PERIODS: usize = 100;

/// Lookahead window for upcoming events, in days
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

fn default_deficit_threshold() -> f64 { DEFAULT_DEFICIT_THRESHOLD }
fn default_max_periods() -> usize { DEFAULT_MAX_PERIODS }
fn default_max_queries() -> usize { 2_000 }
fn default_max_runtime_ms() -> u64 { 30_000 }
fn default_upcoming_days() -> u32 { DEFAULT_UPCOMING_DAYS }

/// Tunables for a [`ForecastEngine`](crate::forecast::ForecastEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Single-period net outflow that triggers a `large_deficit` warning
    #[serde(default = "default_deficit_threshold")]
    pub deficit_threshold: f64,

    /// Period generation cap
    #[serde(default = "default_max_periods")]
    pub max_periods: usize,

    /// Data-source queries allowed per run
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Wall-clock limit per run in milliseconds
    #[serde(default = "default_max_runtime_ms")]
    pub max_runtime_ms: u64,

    /// Default lookahead for upcoming events
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,

    /// Reconcile periods on the rayon pool; the balance fold stays sequential
    #[serde(default)]
    pub parallel_reconciliation: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            deficit_threshold: DEFAULT_DEFICIT_THRESHOLD,
            max_periods: DEFAULT_MAX_PERIODS,
            max_queries: default_max_queries(),
            max_runtime_ms: default_max_runtime_ms(),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            parallel_reconciliation: false,
        }
    }
}

impl ForecastConfig {
    /// Load and validate a JSON config file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ForecastError::Configuration(format!("cannot open {}: {}", path.display(), e))
        })?;
        let config: ForecastConfig = serde_json::from_reader(file).map_err(|e| {
            ForecastError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.deficit_threshold.is_finite() || self.deficit_threshold < 0.0 {
            return Err(ForecastError::Configuration(format!(
                "deficit_threshold must be a non-negative number, got {}",
                self.deficit_threshold
            )));
        }
        if self.max_periods == 0 {
            return Err(ForecastError::Configuration("max_periods must be at least 1".into()));
        }
        if self.max_queries == 0 {
            return Err(ForecastError::Configuration("max_queries must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ForecastConfig =
            serde_json::from_str(r#"{ "deficit_threshold": 2500.0 }"#).unwrap();
        assert_eq!(config.deficit_threshold, 2500.0);
        assert_eq!(config.max_periods, DEFAULT_MAX_PERIODS);
        assert_eq!(config.upcoming_days, 30);
        assert!(!config.parallel_reconciliation);
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let config = ForecastConfig {
            deficit_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ForecastError::Configuration(_))));
    }

    #[test]
    fn test_from_json_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_periods": 12, "parallel_reconciliation": true }}"#).unwrap();

        let config = ForecastConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.max_periods, 12);
        assert!(config.parallel_reconciliation);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{ "max_periods": 0 }}"#).unwrap();
        assert!(ForecastConfig::from_json_path(bad.path()).is_err());
    }
}
