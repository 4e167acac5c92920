//! Period model, generation and temporal classification

mod generator;
mod temporal;

pub use generator::{generate_periods, PeriodGenerator};
pub use temporal::{PeriodTiming, TemporalFlags};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Cadence a date range is split by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PeriodType::Daily),
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            other => Err(ForecastError::Configuration(format!("Unknown period type: {}", other))),
        }
    }
}

/// Inclusive date range aligned to a cadence unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period_type: PeriodType,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate, period_type: PeriodType) -> Self {
        Self { start, end, period_type }
    }

    /// Whether `date` falls inside the period, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_type_parsing() {
        assert_eq!("Monthly".parse::<PeriodType>().unwrap(), PeriodType::Monthly);
        assert_eq!(" weekly ".parse::<PeriodType>().unwrap(), PeriodType::Weekly);
        assert!(matches!(
            "yearly".parse::<PeriodType>(),
            Err(ForecastError::Configuration(_))
        ));
    }

    #[test]
    fn test_period_contains_bounds() {
        let period = Period::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            PeriodType::Monthly,
        );
        assert!(period.contains(period.start));
        assert!(period.contains(period.end));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }
}
