//! Discrete near-term cash events for calendar display

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::context::QueryBudget;
use crate::error::Result;
use crate::records::PaymentStatus;
use crate::source::{DateField, LedgerSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Expense,
    Income,
}

/// A single dated inflow or outflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    /// Category for expenses, counterparty for income
    pub label: String,
    /// Negative for expenses, positive for income
    pub amount: f64,
}

/// Schedule occurrences and pending income due within `days` of `today`
///
/// Sorted by date; same-day events list expenses first, then by label.
/// Both source queries are charged to `budget`.
pub fn upcoming_events<S: LedgerSource + ?Sized>(
    source: &S,
    budget: &QueryBudget,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<CashFlowEvent>> {
    let until = today
        .checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX);

    let mut events = Vec::new();

    budget.charge("active expense schedules")?;
    for schedule in source.active_expense_schedules()? {
        for date in schedule.occurrences_in_period(today, until)? {
            events.push(CashFlowEvent {
                date,
                kind: EventKind::Expense,
                label: schedule.category.clone(),
                amount: -schedule.amount,
            });
        }
    }

    budget.charge("pending income")?;
    for payment in source.query_payments(PaymentStatus::Pending, DateField::DueDate, today, until)? {
        events.push(CashFlowEvent {
            date: payment.date,
            kind: EventKind::Income,
            label: payment.counterparty,
            amount: payment.amount,
        });
    }

    events.sort_by(|a, b| (a.date, a.kind, &a.label).cmp(&(b.date, b.kind, &b.label)));

    log::debug!("{} cash events between {} and {}", events.len(), today, until);
    Ok(events)
}
