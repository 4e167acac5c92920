//! Per-period projection output

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::breakdown::Breakdown;
use crate::error::{ForecastError, Result};
use crate::period::{Period, PeriodTiming};

/// Reconciled cash flow for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub period: Period,
    pub timing: PeriodTiming,

    // Income
    pub actual_income: f64,
    pub expected_income: f64,
    pub projected_income: f64,

    // Contract revenue, reported but not part of net flow
    pub actual_commitments: f64,
    pub expected_commitments: f64,

    // Expenses
    pub actual_expenses: f64,
    pub scheduled_expenses: f64,
    pub projected_expenses: f64,

    // Result
    pub net_flow: f64,
    /// Filled by the running-balance fold
    pub running_balance: f64,
    pub has_deficit: bool,

    pub income_breakdown: Breakdown,
    pub expense_breakdown: Breakdown,
}

impl Projection {
    /// Empty projection for a period
    pub fn new(period: Period, timing: PeriodTiming) -> Self {
        Self {
            period,
            timing,
            actual_income: 0.0,
            expected_income: 0.0,
            projected_income: 0.0,
            actual_commitments: 0.0,
            expected_commitments: 0.0,
            actual_expenses: 0.0,
            scheduled_expenses: 0.0,
            projected_expenses: 0.0,
            net_flow: 0.0,
            running_balance: 0.0,
            has_deficit: false,
            income_breakdown: Breakdown::new(),
            expense_breakdown: Breakdown::new(),
        }
    }

    /// Derive projected totals and net flow from the component amounts
    pub fn finalize_totals(&mut self) {
        self.projected_income = self.actual_income + self.expected_income;
        self.projected_expenses = self.actual_expenses + self.scheduled_expenses;
        self.net_flow = self.projected_income - self.projected_expenses;
        self.has_deficit = self.net_flow < 0.0;
    }
}

/// Flat CSV row for one projection
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    period_start: chrono::NaiveDate,
    period_end: chrono::NaiveDate,
    period_type: &'a str,
    timing: &'a str,
    actual_income: String,
    expected_income: String,
    projected_income: String,
    actual_commitments: String,
    expected_commitments: String,
    actual_expenses: String,
    scheduled_expenses: String,
    projected_expenses: String,
    net_flow: String,
    running_balance: String,
    has_deficit: bool,
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Write projections as CSV, one row per period
pub fn write_projections_csv<W: Write>(writer: W, projections: &[Projection]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for p in projections {
        csv_writer
            .serialize(CsvRow {
                period_start: p.period.start,
                period_end: p.period.end,
                period_type: p.period.period_type.as_str(),
                timing: p.timing.as_str(),
                actual_income: money(p.actual_income),
                expected_income: money(p.expected_income),
                projected_income: money(p.projected_income),
                actual_commitments: money(p.actual_commitments),
                expected_commitments: money(p.expected_commitments),
                actual_expenses: money(p.actual_expenses),
                scheduled_expenses: money(p.scheduled_expenses),
                projected_expenses: money(p.projected_expenses),
                net_flow: money(p.net_flow),
                running_balance: money(p.running_balance),
                has_deficit: p.has_deficit,
            })
            .map_err(|e| ForecastError::Persistence(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| ForecastError::Persistence(e.to_string()))?;
    Ok(())
}
