//! Reconcile one period's actual and expected activity into a projection

use super::breakdown::EntryKind;
use super::context::RunContext;
use super::projection::Projection;
use crate::error::Result;
use crate::period::{Period, TemporalFlags};
use crate::records::{CommitmentStatus, ExpenseStatus, PaymentStatus};
use crate::source::{DateField, LedgerSource};

/// Build the projection for `period`
///
/// Realized sources are consulted for past and current periods, forecast
/// sources for current and future ones. `running_balance` is left at zero
/// for the fold to fill in.
pub fn reconcile_period<S: LedgerSource + ?Sized>(
    source: &S,
    ctx: &RunContext,
    period: &Period,
) -> Result<Projection> {
    let flags = TemporalFlags::classify(period, ctx.today);
    let mut projection = Projection::new(*period, flags.timing());

    if flags.uses_actuals() {
        add_actual_income(source, ctx, period, &mut projection)?;
        projection.actual_commitments = sum_commitments(source, ctx, period, &CommitmentStatus::SIGNED)?;
        add_actual_expenses(source, ctx, period, &mut projection)?;
    }

    if flags.uses_expected() {
        add_expected_income(source, ctx, period, &mut projection)?;
        projection.expected_commitments = sum_commitments(source, ctx, period, &CommitmentStatus::PROSPECTIVE)?;
        add_scheduled_expenses(ctx, period, &mut projection)?;
    }

    projection.finalize_totals();

    log::debug!(
        "{} {}..{}: income {:.2}, expenses {:.2}, net {:.2}",
        projection.timing,
        period.start,
        period.end,
        projection.projected_income,
        projection.projected_expenses,
        projection.net_flow
    );

    Ok(projection)
}

fn add_actual_income<S: LedgerSource + ?Sized>(
    source: &S,
    ctx: &RunContext,
    period: &Period,
    projection: &mut Projection,
) -> Result<()> {
    ctx.budget.charge("paid payments")?;
    let rows = source.query_payments(PaymentStatus::Paid, DateField::PaidDate, period.start, period.end)?;
    for row in rows {
        let amount = row.realized_amount();
        projection.actual_income += amount;
        projection.income_breakdown.add(&row.counterparty, EntryKind::Actual, amount);
    }
    Ok(())
}

fn add_expected_income<S: LedgerSource + ?Sized>(
    source: &S,
    ctx: &RunContext,
    period: &Period,
    projection: &mut Projection,
) -> Result<()> {
    ctx.budget.charge("pending payments")?;
    let rows = source.query_payments(PaymentStatus::Pending, DateField::DueDate, period.start, period.end)?;
    for row in rows {
        projection.expected_income += row.amount;
        projection.income_breakdown.add(&row.counterparty, EntryKind::Expected, row.amount);
    }
    Ok(())
}

fn sum_commitments<S: LedgerSource + ?Sized>(
    source: &S,
    ctx: &RunContext,
    period: &Period,
    statuses: &[CommitmentStatus],
) -> Result<f64> {
    ctx.budget.charge("commitments")?;
    let rows = source.query_commitments(statuses, period.start, period.end)?;
    Ok(rows.iter().map(|c| c.total_amount).sum())
}

fn add_actual_expenses<S: LedgerSource + ?Sized>(
    source: &S,
    ctx: &RunContext,
    period: &Period,
    projection: &mut Projection,
) -> Result<()> {
    ctx.budget.charge("paid expenses")?;
    let rows = source.query_expenses(ExpenseStatus::Paid, period.start, period.end)?;
    for row in rows {
        let amount = row.realized_amount();
        projection.actual_expenses += amount;
        projection.expense_breakdown.add(&row.category, EntryKind::Actual, amount);
    }
    Ok(())
}

fn add_scheduled_expenses(ctx: &RunContext, period: &Period, projection: &mut Projection) -> Result<()> {
    for schedule in &ctx.schedules {
        let count = schedule.occurrences_in_period(period.start, period.end)?.len();
        if count == 0 {
            continue;
        }
        let amount = schedule.amount * count as f64;
        projection.scheduled_expenses += amount;
        projection.expense_breakdown.add(&schedule.category, EntryKind::Scheduled, amount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataSourceError, ForecastError};
    use crate::forecast::context::QueryBudget;
    use crate::period::{PeriodTiming, PeriodType};
    use crate::records::{
        CommitmentRecord, ExpenseRecord, ExpenseSchedule, Frequency, IncomeRecord,
    };
    use crate::source::{CommitmentRow, ExpenseRow, InMemoryLedger, PaymentRow};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> Period {
        Period::new(date(2024, 1, 1), date(2024, 1, 31), PeriodType::Monthly)
    }

    fn context(today: NaiveDate, schedules: Vec<ExpenseSchedule>) -> RunContext {
        RunContext {
            today,
            schedules,
            budget: QueryBudget::new(100, Duration::from_secs(60)),
        }
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new()
            .with_payment(IncomeRecord::paid("Acme", 500.0, date(2024, 1, 10)))
            .with_payment(IncomeRecord::pending("Globex", 300.0, date(2024, 1, 20)))
            .with_expense(ExpenseRecord::paid("Travel", 120.0, date(2024, 1, 3)))
            .with_commitment(CommitmentRecord::new("Initech", 9000.0, CommitmentStatus::Active, date(2024, 1, 2)))
            .with_commitment(CommitmentRecord::new("Hooli", 4000.0, CommitmentStatus::Draft, date(2024, 1, 25)))
    }

    #[test]
    fn test_current_period_combines_actual_and_expected() {
        let rent = ExpenseSchedule::new("Rent", "Facilities", 1000.0, Frequency::Monthly, date(2023, 6, 1));
        let ctx = context(date(2024, 1, 15), vec![rent]);

        let p = reconcile_period(&ledger(), &ctx, &january()).unwrap();

        assert_eq!(p.timing, PeriodTiming::Current);
        assert_relative_eq!(p.actual_income, 500.0);
        assert_relative_eq!(p.expected_income, 300.0);
        assert_relative_eq!(p.projected_income, 800.0);
        assert_relative_eq!(p.actual_expenses, 120.0);
        assert_relative_eq!(p.scheduled_expenses, 1000.0);
        assert_relative_eq!(p.net_flow, 800.0 - 1120.0);
        assert_relative_eq!(p.actual_commitments, 9000.0);
        assert_relative_eq!(p.expected_commitments, 4000.0);
        assert!(p.has_deficit);
        assert_eq!(p.income_breakdown.get("Globex", EntryKind::Expected), Some(300.0));
        assert_eq!(p.expense_breakdown.get("Facilities", EntryKind::Scheduled), Some(1000.0));
    }

    #[test]
    fn test_past_period_ignores_forecast_sources() {
        let rent = ExpenseSchedule::new("Rent", "Facilities", 1000.0, Frequency::Monthly, date(2023, 6, 1));
        let ctx = context(date(2024, 3, 1), vec![rent]);

        let p = reconcile_period(&ledger(), &ctx, &january()).unwrap();

        assert_eq!(p.timing, PeriodTiming::Past);
        assert_relative_eq!(p.projected_income, 500.0);
        assert_relative_eq!(p.projected_expenses, 120.0);
        assert_relative_eq!(p.expected_commitments, 0.0);
        assert!(p.expense_breakdown.get("Facilities", EntryKind::Scheduled).is_none());
    }

    #[test]
    fn test_future_period_ignores_realized_sources() {
        let payroll = ExpenseSchedule::new("Payroll", "Salaries", 250.0, Frequency::Weekly, date(2024, 1, 5));
        let ctx = context(date(2023, 12, 1), vec![payroll]);

        let p = reconcile_period(&ledger(), &ctx, &january()).unwrap();

        assert_eq!(p.timing, PeriodTiming::Future);
        assert_relative_eq!(p.actual_income, 0.0);
        assert_relative_eq!(p.expected_income, 300.0);
        // Jan 5, 12, 19, 26
        assert_relative_eq!(p.scheduled_expenses, 1000.0);
        assert_relative_eq!(p.actual_commitments, 0.0);
    }

    struct FailingSource;

    impl LedgerSource for FailingSource {
        fn query_payments(
            &self,
            _: PaymentStatus,
            _: DateField,
            _: NaiveDate,
            _: NaiveDate,
        ) -> std::result::Result<Vec<PaymentRow>, DataSourceError> {
            Err(DataSourceError::Unavailable("ledger offline".into()))
        }
        fn query_commitments(
            &self,
            _: &[CommitmentStatus],
            _: NaiveDate,
            _: NaiveDate,
        ) -> std::result::Result<Vec<CommitmentRow>, DataSourceError> {
            Ok(Vec::new())
        }
        fn query_expenses(
            &self,
            _: ExpenseStatus,
            _: NaiveDate,
            _: NaiveDate,
        ) -> std::result::Result<Vec<ExpenseRow>, DataSourceError> {
            Ok(Vec::new())
        }
        fn active_expense_schedules(
            &self,
        ) -> std::result::Result<Vec<ExpenseSchedule>, DataSourceError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_query_failure_propagates() {
        let ctx = context(date(2024, 1, 15), Vec::new());
        let err = reconcile_period(&FailingSource, &ctx, &january()).unwrap_err();
        assert!(matches!(err, ForecastError::DataSource(DataSourceError::Unavailable(_))));
    }
}
