//! Totals and averages across a projection run

use serde::{Deserialize, Serialize};

use super::projection::Projection;

/// Summary statistics for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub period_count: usize,
    pub total_projected_income: f64,
    pub total_projected_expenses: f64,
    pub net_cash_flow: f64,
    pub periods_with_deficit: usize,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub total_actual_commitments: f64,
    pub total_expected_commitments: f64,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub lowest_balance: f64,
}

impl CashFlowSummary {
    /// Summarize `projections`; an empty run reports the starting balance
    pub fn from_projections(projections: &[Projection], starting_balance: f64) -> Self {
        let total_projected_income: f64 = projections.iter().map(|p| p.projected_income).sum();
        let total_projected_expenses: f64 = projections.iter().map(|p| p.projected_expenses).sum();
        let count = projections.len();

        let (average_monthly_income, average_monthly_expenses) = if count == 0 {
            (0.0, 0.0)
        } else {
            (
                total_projected_income / count as f64,
                total_projected_expenses / count as f64,
            )
        };

        let final_balance = projections
            .last()
            .map(|p| p.running_balance)
            .unwrap_or(starting_balance);
        let lowest_balance = projections
            .iter()
            .map(|p| p.running_balance)
            .fold(None, |low: Option<f64>, b| Some(low.map_or(b, |l| l.min(b))))
            .unwrap_or(starting_balance);

        Self {
            period_count: count,
            total_projected_income,
            total_projected_expenses,
            net_cash_flow: projections.iter().map(|p| p.net_flow).sum(),
            periods_with_deficit: projections.iter().filter(|p| p.has_deficit).count(),
            average_monthly_income,
            average_monthly_expenses,
            total_actual_commitments: projections.iter().map(|p| p.actual_commitments).sum(),
            total_expected_commitments: projections.iter().map(|p| p.expected_commitments).sum(),
            starting_balance,
            final_balance,
            lowest_balance,
        }
    }

    /// True when the run produced no periods
    pub fn is_empty(&self) -> bool {
        self.period_count == 0
    }
}
