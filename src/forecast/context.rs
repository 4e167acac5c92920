//! Per-run state shared by every period's reconciliation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::error::{ForecastError, Result};
use crate::records::ExpenseSchedule;

/// Query and wall-clock allowance for one run
///
/// Safe to charge from several threads at once.
#[derive(Debug)]
pub struct QueryBudget {
    max_queries: usize,
    time_limit: Duration,
    started: Instant,
    used: AtomicUsize,
}

impl QueryBudget {
    pub fn new(max_queries: usize, time_limit: Duration) -> Self {
        Self {
            max_queries,
            time_limit,
            started: Instant::now(),
            used: AtomicUsize::new(0),
        }
    }

    /// Record one data-source query, failing once either limit is exceeded
    pub fn charge(&self, query: &str) -> Result<()> {
        let used = self.used.fetch_add(1, Ordering::Relaxed) + 1;
        if used > self.max_queries {
            return Err(ForecastError::BudgetExceeded(format!(
                "{} would be query {} of at most {}",
                query, used, self.max_queries
            )));
        }
        let elapsed = self.started.elapsed();
        if elapsed > self.time_limit {
            return Err(ForecastError::BudgetExceeded(format!(
                "{} issued after {:?}, limit is {:?}",
                query, elapsed, self.time_limit
            )));
        }
        Ok(())
    }

    pub fn queries_used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }
}

/// Inputs fetched once per run and handed to each period
///
/// Owned by a single `generate_projections` call and dropped when it returns,
/// so overlapping runs never share schedule state.
#[derive(Debug)]
pub struct RunContext {
    pub today: NaiveDate,
    pub schedules: Vec<ExpenseSchedule>,
    pub budget: QueryBudget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_limit() {
        let budget = QueryBudget::new(2, Duration::from_secs(60));
        assert!(budget.charge("a").is_ok());
        assert!(budget.charge("b").is_ok());
        assert!(matches!(budget.charge("c"), Err(ForecastError::BudgetExceeded(_))));
        assert_eq!(budget.queries_used(), 3);
    }

    #[test]
    fn test_time_limit() {
        let budget = QueryBudget::new(100, Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(budget.charge("slow"), Err(ForecastError::BudgetExceeded(_))));
    }
}
