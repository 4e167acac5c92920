//! Forecast engine: periods in, reconciled projections with running balance out

use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use rayon::prelude::*;

use super::context::{QueryBudget, RunContext};
use super::events::{upcoming_events, CashFlowEvent};
use super::problems::{detect_problems, Problem};
use super::projection::Projection;
use super::reconcile::reconcile_period;
use super::summary::CashFlowSummary;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::period::{generate_periods, PeriodType};
use crate::snapshot::{ProjectionSnapshot, SnapshotStore};
use crate::source::LedgerSource;

/// Main forecast engine
pub struct ForecastEngine<S: LedgerSource> {
    source: S,
    config: ForecastConfig,
    starting_balance: f64,
    today: NaiveDate,
}

impl<S: LedgerSource> ForecastEngine<S> {
    /// Create an engine over `source`, anchored at the local calendar date
    pub fn new(source: S, config: ForecastConfig) -> Self {
        Self {
            source,
            config,
            starting_balance: 0.0,
            today: Local::now().date_naive(),
        }
    }

    /// Cash on hand before the first period
    pub fn with_starting_balance(mut self, amount: f64) -> Self {
        self.starting_balance = amount;
        self
    }

    /// Override the reference date used for past/current/future classification
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Reconcile every period of `[start, end]` and fold the running balance
    ///
    /// Fails as a whole if any period's queries fail; a partial forecast would
    /// carry a wrong balance into every later period.
    pub fn generate_projections(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period_type: PeriodType,
    ) -> Result<Vec<Projection>> {
        self.config.validate()?;
        let periods = generate_periods(start, end, period_type, self.config.max_periods)?;
        let ctx = self.begin_run()?;

        log::info!(
            "Projecting {} {} periods from {} to {} (today {})",
            periods.len(),
            period_type,
            start,
            end,
            ctx.today
        );

        let mut projections: Vec<Projection> = if self.config.parallel_reconciliation {
            periods
                .par_iter()
                .map(|period| reconcile_period(&self.source, &ctx, period))
                .collect::<Result<Vec<_>>>()?
        } else {
            periods
                .iter()
                .map(|period| reconcile_period(&self.source, &ctx, period))
                .collect::<Result<Vec<_>>>()?
        };

        apply_running_balance(&mut projections, self.starting_balance);

        log::info!(
            "Projection complete: {} periods, {} queries, final balance {:.2}",
            projections.len(),
            ctx.budget.queries_used(),
            projections.last().map_or(self.starting_balance, |p| p.running_balance)
        );

        Ok(projections)
    }

    /// Generate projections, then upsert a snapshot of each into `store`
    pub fn generate_and_save_projections(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period_type: PeriodType,
        store: &mut dyn SnapshotStore,
    ) -> Result<Vec<Projection>> {
        let projections = self.generate_projections(start, end, period_type)?;
        let calculated_at = Utc::now().naive_utc();

        for projection in &projections {
            store.upsert(ProjectionSnapshot::from_projection(projection, calculated_at))?;
        }
        store.flush()?;

        Ok(projections)
    }

    /// Monthly summary over `[start, end]`
    pub fn cash_flow_summary(&self, start: NaiveDate, end: NaiveDate) -> Result<CashFlowSummary> {
        let projections = self.generate_projections(start, end, PeriodType::Monthly)?;
        let summary = CashFlowSummary::from_projections(&projections, self.starting_balance);
        if summary.is_empty() {
            log::warn!("No periods between {} and {}", start, end);
        }
        Ok(summary)
    }

    /// Negative-balance and large-deficit periods over `[start, end]`, monthly
    pub fn identify_cash_flow_problems(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Problem>> {
        let projections = self.generate_projections(start, end, PeriodType::Monthly)?;
        let problems = detect_problems(&projections, self.config.deficit_threshold);
        for problem in &problems {
            log::warn!("{:?} {:?}: {}", problem.severity, problem.kind, problem.message);
        }
        Ok(problems)
    }

    /// Discrete events due within `days` of today
    pub fn upcoming_cash_flow_events(&self, days: u32) -> Result<Vec<CashFlowEvent>> {
        upcoming_events(&self.source, &self.new_budget(), self.today, days)
    }

    fn new_budget(&self) -> QueryBudget {
        QueryBudget::new(
            self.config.max_queries,
            Duration::from_millis(self.config.max_runtime_ms),
        )
    }

    /// Fetch run-scoped inputs; the context lives only as long as one call
    fn begin_run(&self) -> Result<RunContext> {
        let budget = self.new_budget();
        budget.charge("active expense schedules")?;
        let schedules = self.source.active_expense_schedules()?;
        log::debug!("Loaded {} active expense schedules", schedules.len());

        Ok(RunContext {
            today: self.today,
            schedules,
            budget,
        })
    }
}

/// Fold net flow into a cumulative balance, strictly in period order
pub fn apply_running_balance(projections: &mut [Projection], starting_balance: f64) {
    let mut balance = starting_balance;
    for projection in projections.iter_mut() {
        balance += projection.net_flow;
        projection.running_balance = balance;
    }
}
