//! Recurring expense definitions and their occurrence dates

use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DataSourceError, ForecastError, Result};

/// Upper bound on recurrence steps walked in one enumeration
const MAX_OCCURRENCE_STEPS: u32 = 10_000;

/// How often a scheduled expense recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

enum Step {
    Days(u64),
    Months(u32),
}

impl Frequency {
    fn step(&self) -> Step {
        match self {
            Frequency::Daily => Step::Days(1),
            Frequency::Weekly => Step::Days(7),
            Frequency::Biweekly => Step::Days(14),
            Frequency::Monthly => Step::Months(1),
            Frequency::Quarterly => Step::Months(3),
            Frequency::Yearly => Step::Months(12),
        }
    }
}

impl FromStr for Frequency {
    type Err = DataSourceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" | "annual" => Ok(Frequency::Yearly),
            other => Err(DataSourceError::Parse(format!("Unknown frequency: {}", other))),
        }
    }
}

/// A recurring expense such as rent, payroll or a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSchedule {
    pub name: String,
    pub category: String,
    /// Amount charged per occurrence
    pub amount: f64,
    pub frequency: Frequency,
    /// First occurrence; later ones are derived from it
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl ExpenseSchedule {
    pub fn new(name: &str, category: &str, amount: f64, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            amount,
            frequency,
            start_date,
            end_date: None,
            active: true,
        }
    }

    /// Date of the `n`th occurrence (0-indexed)
    ///
    /// Month-based steps are always taken from the anchor, so a schedule
    /// starting on the 31st lands on the last day of shorter months and
    /// returns to the 31st afterwards.
    pub fn nth_occurrence(&self, n: u32) -> Option<NaiveDate> {
        match self.frequency.step() {
            Step::Days(days) => self.start_date.checked_add_days(Days::new(days * n as u64)),
            Step::Months(months) => self.start_date.checked_add_months(Months::new(months.checked_mul(n)?)),
        }
    }

    /// Every occurrence falling inside `[from, to]`, ascending
    ///
    /// Fails with `OccurrenceLimitReached` rather than returning a partial list
    /// when the window holds more occurrences than one call will walk.
    pub fn occurrences_in_period(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>> {
        let lower = from.max(self.start_date);
        let upper = match self.end_date {
            Some(end) => to.min(end),
            None => to,
        };
        if !self.active || lower > upper {
            return Ok(Vec::new());
        }

        let first = self.index_near(lower);
        let mut dates = Vec::new();
        for n in first..first.saturating_add(MAX_OCCURRENCE_STEPS) {
            let Some(date) = self.nth_occurrence(n) else { return Ok(dates) };
            if date > upper {
                return Ok(dates);
            }
            if date >= lower {
                dates.push(date);
            }
        }

        match self.nth_occurrence(first.saturating_add(MAX_OCCURRENCE_STEPS)) {
            Some(next_date) if next_date <= upper => Err(ForecastError::OccurrenceLimitReached {
                schedule: self.name.clone(),
                limit: MAX_OCCURRENCE_STEPS,
                next_date,
            }),
            _ => Ok(dates),
        }
    }

    /// An occurrence index at or before the first one on/after `date`
    fn index_near(&self, date: NaiveDate) -> u32 {
        match self.frequency.step() {
            Step::Days(days) => {
                let elapsed = (date - self.start_date).num_days().max(0) as u64;
                (elapsed / days) as u32
            }
            Step::Months(months) => {
                let elapsed = (date.year() - self.start_date.year()) * 12
                    + date.month() as i32
                    - self.start_date.month() as i32;
                // one step back covers day-of-month clamping
                ((elapsed.max(0) as u32) / months).saturating_sub(1)
            }
        }
    }
}
