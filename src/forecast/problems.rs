//! Detect negative balances and unusually large period deficits

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::projection::Projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    NegativeBalance,
    LargeDeficit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// A flagged period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub severity: Severity,
    /// Start of the flagged period
    pub date: NaiveDate,
    pub amount: f64,
    pub message: String,
}

/// Scan finished projections in order; at most one problem per period
///
/// A negative cumulative balance is always critical. Otherwise a period whose
/// net outflow exceeds `deficit_threshold` is a warning.
pub fn detect_problems(projections: &[Projection], deficit_threshold: f64) -> Vec<Problem> {
    projections
        .iter()
        .filter_map(|p| check_projection(p, deficit_threshold))
        .collect()
}

fn check_projection(p: &Projection, deficit_threshold: f64) -> Option<Problem> {
    if p.running_balance < 0.0 {
        let amount = p.running_balance.abs();
        return Some(Problem {
            kind: ProblemKind::NegativeBalance,
            severity: Severity::Critical,
            date: p.period.start,
            amount,
            message: format!(
                "Projected balance falls to -{:.2} in period {} to {}",
                amount, p.period.start, p.period.end
            ),
        });
    }

    if p.has_deficit && p.net_flow.abs() > deficit_threshold {
        let amount = p.net_flow.abs();
        return Some(Problem {
            kind: ProblemKind::LargeDeficit,
            severity: Severity::Warning,
            date: p.period.start,
            amount,
            message: format!(
                "Net outflow of {:.2} in period {} to {} exceeds {:.2}",
                amount, p.period.start, p.period.end, deficit_threshold
            ),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{Period, PeriodTiming, PeriodType};

    fn projection(month: u32, net_flow: f64, running_balance: f64) -> Projection {
        let start = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
        let mut p = Projection::new(Period::new(start, start, PeriodType::Monthly), PeriodTiming::Future);
        p.net_flow = net_flow;
        p.has_deficit = net_flow < 0.0;
        p.running_balance = running_balance;
        p
    }

    #[test]
    fn test_large_deficit_with_positive_balance_is_warning() {
        let problems = detect_problems(&[projection(1, -6000.0, 2000.0)], 5000.0);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::LargeDeficit);
        assert_eq!(problems[0].severity, Severity::Warning);
        assert_eq!(problems[0].amount, 6000.0);
    }

    #[test]
    fn test_negative_balance_takes_precedence() {
        let problems = detect_problems(&[projection(1, -6000.0, -500.0)], 5000.0);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::NegativeBalance);
        assert_eq!(problems[0].severity, Severity::Critical);
        assert_eq!(problems[0].amount, 500.0);
    }

    #[test]
    fn test_small_outflow_negative_balance_is_still_critical() {
        let problems = detect_problems(&[projection(2, -10.0, -5.0)], 5000.0);
        assert_eq!(problems[0].severity, Severity::Critical);
    }

    #[test]
    fn test_threshold_is_exclusive_and_configurable() {
        let periods = [projection(1, -5000.0, 1000.0), projection(2, -1500.0, 1000.0)];
        assert!(detect_problems(&periods, 5000.0).is_empty());
        let problems = detect_problems(&periods, 1000.0);
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[1].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
