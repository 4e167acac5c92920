//! Past/current/future classification of a period against a reference date

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Period;

/// Display label of a period relative to the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodTiming {
    Past,
    Current,
    Future,
}

impl PeriodTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodTiming::Past => "past",
            PeriodTiming::Current => "current",
            PeriodTiming::Future => "future",
        }
    }
}

impl fmt::Display for PeriodTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Temporal flags for one period
///
/// A current period draws on both realized and forecast data, so the
/// `uses_*` gates overlap even though the flags themselves do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFlags {
    pub is_past: bool,
    pub is_current: bool,
    pub is_future: bool,
}

impl TemporalFlags {
    pub fn classify(period: &Period, today: NaiveDate) -> Self {
        Self {
            is_past: period.end < today,
            is_current: period.start <= today && today <= period.end,
            is_future: period.start > today,
        }
    }

    /// Realized records (paid income, paid expenses, signed commitments) apply
    pub fn uses_actuals(&self) -> bool {
        self.is_past || self.is_current
    }

    /// Forecast records (pending income, schedules, draft commitments) apply
    pub fn uses_expected(&self) -> bool {
        self.is_current || self.is_future
    }

    /// Label with precedence past > current > future
    pub fn timing(&self) -> PeriodTiming {
        if self.is_past {
            PeriodTiming::Past
        } else if self.is_current {
            PeriodTiming::Current
        } else {
            PeriodTiming::Future
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodType;

    fn january() -> Period {
        Period::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            PeriodType::Monthly,
        )
    }

    #[test]
    fn test_past_period() {
        let flags = TemporalFlags::classify(&january(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(flags.is_past && !flags.is_current && !flags.is_future);
        assert!(flags.uses_actuals());
        assert!(!flags.uses_expected());
        assert_eq!(flags.timing(), PeriodTiming::Past);
    }

    #[test]
    fn test_current_period_uses_both_sources() {
        for day in [1, 15, 31] {
            let today = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            let flags = TemporalFlags::classify(&january(), today);
            assert!(!flags.is_past && flags.is_current && !flags.is_future);
            assert!(flags.uses_actuals() && flags.uses_expected());
            assert_eq!(flags.timing(), PeriodTiming::Current);
        }
    }

    #[test]
    fn test_future_period() {
        let flags = TemporalFlags::classify(&january(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(!flags.is_past && !flags.is_current && flags.is_future);
        assert!(!flags.uses_actuals());
        assert_eq!(flags.timing().to_string(), "future");
    }
}
