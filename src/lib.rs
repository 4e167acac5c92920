//! Cash Flow Forecast - period-by-period cash position projection
//!
//! This library provides:
//! - Boundary-safe period generation (daily, weekly, monthly)
//! - Past/current/future classification deciding which records apply
//! - Reconciliation of realized and expected income/expenses per period
//! - Running-balance fold, problem detection and run summaries
//! - Upcoming cash events and persisted projection snapshots

pub mod config;
pub mod error;
pub mod forecast;
pub mod period;
pub mod records;
pub mod snapshot;
pub mod source;

// Re-export commonly used types
pub use config::ForecastConfig;
pub use error::{DataSourceError, ForecastError, Result};
pub use forecast::{CashFlowEvent, CashFlowSummary, ForecastEngine, Problem, Projection};
pub use period::{Period, PeriodTiming, PeriodType};
pub use source::{InMemoryLedger, LedgerSource};
