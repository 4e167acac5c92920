//! Query contract consumed by the forecast engine
//!
//! The engine never owns financial records; it asks a [`LedgerSource`] for
//! the rows relevant to one period at a time. [`InMemoryLedger`] is the
//! reference implementation used by the CLI and tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataSourceError;
use crate::records::{
    CommitmentRecord, CommitmentStatus, ExpenseRecord, ExpenseSchedule, ExpenseStatus, IncomeRecord,
    PaymentStatus,
};

/// Which payment date a range filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    PaidDate,
    DueDate,
}

/// One payment returned by [`LedgerSource::query_payments`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub amount: f64,
    pub paid_amount: Option<f64>,
    pub date: NaiveDate,
    pub counterparty: String,
}

/// One contract returned by [`LedgerSource::query_commitments`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentRow {
    pub total_amount: f64,
    pub start_date: NaiveDate,
}

/// One expense returned by [`LedgerSource::query_expenses`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub amount: f64,
    pub paid_amount: Option<f64>,
    pub category: String,
    pub date: NaiveDate,
}

impl PaymentRow {
    pub fn realized_amount(&self) -> f64 {
        self.paid_amount.unwrap_or(self.amount)
    }
}

impl ExpenseRow {
    pub fn realized_amount(&self) -> f64 {
        self.paid_amount.unwrap_or(self.amount)
    }
}

/// Read-only queries against the accounting ledger
///
/// Ranges are inclusive on both ends. Implementations must be shareable
/// across threads because periods may be reconciled in parallel.
pub trait LedgerSource: Send + Sync {
    fn query_payments(
        &self,
        status: PaymentStatus,
        field: DateField,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PaymentRow>, DataSourceError>;

    fn query_commitments(
        &self,
        statuses: &[CommitmentStatus],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CommitmentRow>, DataSourceError>;

    fn query_expenses(
        &self,
        status: ExpenseStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ExpenseRow>, DataSourceError>;

    fn active_expense_schedules(&self) -> Result<Vec<ExpenseSchedule>, DataSourceError>;
}

/// Ledger snapshot held entirely in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    pub payments: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub schedules: Vec<ExpenseSchedule>,
    pub commitments: Vec<CommitmentRecord>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(mut self, record: IncomeRecord) -> Self {
        self.payments.push(record);
        self
    }

    pub fn with_expense(mut self, record: ExpenseRecord) -> Self {
        self.expenses.push(record);
        self
    }

    pub fn with_schedule(mut self, schedule: ExpenseSchedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    pub fn with_commitment(mut self, record: CommitmentRecord) -> Self {
        self.commitments.push(record);
        self
    }
}

fn in_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    from <= date && date <= to
}

impl LedgerSource for InMemoryLedger {
    fn query_payments(
        &self,
        status: PaymentStatus,
        field: DateField,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PaymentRow>, DataSourceError> {
        Ok(self
            .payments
            .iter()
            .filter(|p| p.status == status)
            .filter_map(|p| {
                let date = match field {
                    DateField::PaidDate => p.paid_date?,
                    DateField::DueDate => p.due_date,
                };
                in_range(date, from, to).then(|| PaymentRow {
                    amount: p.amount,
                    paid_amount: p.paid_amount,
                    date,
                    counterparty: p.counterparty.clone(),
                })
            })
            .collect())
    }

    fn query_commitments(
        &self,
        statuses: &[CommitmentStatus],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CommitmentRow>, DataSourceError> {
        Ok(self
            .commitments
            .iter()
            .filter(|c| statuses.contains(&c.status) && in_range(c.start_date, from, to))
            .map(|c| CommitmentRow {
                total_amount: c.total_amount,
                start_date: c.start_date,
            })
            .collect())
    }

    fn query_expenses(
        &self,
        status: ExpenseStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ExpenseRow>, DataSourceError> {
        Ok(self
            .expenses
            .iter()
            .filter(|e| e.status == status && in_range(e.date, from, to))
            .map(|e| ExpenseRow {
                amount: e.amount,
                paid_amount: e.paid_amount,
                category: e.category.clone(),
                date: e.date,
            })
            .collect())
    }

    fn active_expense_schedules(&self) -> Result<Vec<ExpenseSchedule>, DataSourceError> {
        Ok(self.schedules.iter().filter(|s| s.active).cloned().collect())
    }
}
