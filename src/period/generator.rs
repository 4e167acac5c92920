//! Boundary-safe period generation
//!
//! Each period ends at the natural end of its cadence unit (end of day, Sunday
//! of the week, last day of the month), clipped to the requested end date. The
//! cursor always advances from the *natural* end so a range ending mid-unit
//! still terminates.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::{Period, PeriodType};
use crate::error::{ForecastError, Result};

/// Bounded iterator over the periods covering `[start, end]`
///
/// Yields `Err(SafetyLimitReached)` once, then stops, if the limit is hit while
/// dates remain uncovered.
#[derive(Debug, Clone)]
pub struct PeriodGenerator {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    period_type: PeriodType,
    limit: usize,
    emitted: usize,
}

impl PeriodGenerator {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Self> {
        if end < start {
            return Err(ForecastError::Configuration(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self {
            cursor: Some(start),
            end,
            period_type,
            limit,
            emitted: 0,
        })
    }
}

impl Iterator for PeriodGenerator {
    type Item = Result<Period>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.filter(|c| *c <= self.end)?;

        if self.emitted >= self.limit {
            self.cursor = None;
            return Some(Err(ForecastError::SafetyLimitReached {
                limit: self.limit,
                next_start: current,
            }));
        }

        let natural = natural_end(current, self.period_type);
        let clipped = natural.min(self.end);

        self.cursor = natural.succ_opt();
        self.emitted += 1;

        Some(Ok(Period::new(current, clipped, self.period_type)))
    }
}

/// Collect every period of `[start, end]`, failing if more than `limit` are needed
pub fn generate_periods(
    start: NaiveDate,
    end: NaiveDate,
    period_type: PeriodType,
    limit: usize,
) -> Result<Vec<Period>> {
    PeriodGenerator::new(start, end, period_type, limit)?.collect()
}

/// Last day of the cadence unit containing `date`
fn natural_end(date: NaiveDate, period_type: PeriodType) -> NaiveDate {
    match period_type {
        PeriodType::Daily => date,
        PeriodType::Weekly => {
            let remaining = 6 - date.weekday().num_days_from_monday() as u64;
            date.checked_add_days(Days::new(remaining)).unwrap_or(NaiveDate::MAX)
        }
        PeriodType::Monthly => date
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .and_then(|next_first| next_first.pred_opt())
            .unwrap_or(NaiveDate::MAX),
    }
}
