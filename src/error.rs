//! Error types for forecast runs and data sources

use chrono::NaiveDate;
use thiserror::Error;

/// Failure raised by a [`LedgerSource`](crate::source::LedgerSource) query
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid record: {0}")]
    Parse(String),
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Errors a forecast run can return
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// Period generation hit its cap before covering the requested range
    #[error("Period limit of {limit} reached; range not covered from {next_start}")]
    SafetyLimitReached { limit: usize, next_start: NaiveDate },

    /// A schedule produced more occurrences in one window than can be enumerated
    #[error("Schedule '{schedule}' exceeds {limit} occurrences; uncovered from {next_date}")]
    OccurrenceLimitReached { schedule: String, limit: u32, next_date: NaiveDate },

    #[error("Query budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("Snapshot persistence failed: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
