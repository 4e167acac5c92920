//! Financial records supplied by the ledger collaborator

pub mod loader;
mod schedule;

pub use loader::{load_commitments, load_expenses, load_income, load_ledger_dir, load_schedules};
pub use schedule::{ExpenseSchedule, Frequency};

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataSourceError;

/// Settlement status of an incoming payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Cancelled,
}

/// Settlement status of a one-off expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Paid,
    Pending,
    Cancelled,
}

/// Lifecycle status of a revenue contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    Draft,
    Approved,
    Active,
    Completed,
    Cancelled,
}

impl CommitmentStatus {
    /// Signed contracts whose revenue counts as realized
    pub const SIGNED: [CommitmentStatus; 2] = [CommitmentStatus::Approved, CommitmentStatus::Active];
    /// Contracts still under negotiation
    pub const PROSPECTIVE: [CommitmentStatus; 1] = [CommitmentStatus::Draft];
}

macro_rules! parse_status {
    ($ty:ident, $what:literal, { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = DataSourceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(DataSourceError::Parse(format!("Unknown {}: {}", $what, other))),
                }
            }
        }
    };
}

parse_status!(PaymentStatus, "payment status", {
    "paid" => Paid,
    "pending" => Pending,
    "cancelled" => Cancelled,
});

parse_status!(ExpenseStatus, "expense status", {
    "paid" => Paid,
    "pending" => Pending,
    "cancelled" => Cancelled,
});

parse_status!(CommitmentStatus, "commitment status", {
    "draft" => Draft,
    "approved" => Approved,
    "active" => Active,
    "completed" => Completed,
    "cancelled" => Cancelled,
});

/// A customer payment, settled or still due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub counterparty: String,
    pub amount: f64,
    /// Amount actually received, when it differs from the invoiced amount
    pub paid_amount: Option<f64>,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl IncomeRecord {
    pub fn pending(counterparty: &str, amount: f64, due_date: NaiveDate) -> Self {
        Self {
            counterparty: counterparty.to_string(),
            amount,
            paid_amount: None,
            status: PaymentStatus::Pending,
            due_date,
            paid_date: None,
        }
    }

    pub fn paid(counterparty: &str, amount: f64, paid_date: NaiveDate) -> Self {
        Self {
            counterparty: counterparty.to_string(),
            amount,
            paid_amount: None,
            status: PaymentStatus::Paid,
            due_date: paid_date,
            paid_date: Some(paid_date),
        }
    }

    /// Received amount if recorded, else the invoiced amount
    pub fn realized_amount(&self) -> f64 {
        self.paid_amount.unwrap_or(self.amount)
    }
}

/// A one-off business expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: String,
    pub amount: f64,
    pub paid_amount: Option<f64>,
    pub status: ExpenseStatus,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn paid(category: &str, amount: f64, date: NaiveDate) -> Self {
        Self {
            category: category.to_string(),
            amount,
            paid_amount: None,
            status: ExpenseStatus::Paid,
            date,
        }
    }

    pub fn realized_amount(&self) -> f64 {
        self.paid_amount.unwrap_or(self.amount)
    }
}

/// A revenue contract, distinct from its scheduled payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    pub counterparty: String,
    pub total_amount: f64,
    pub status: CommitmentStatus,
    pub start_date: NaiveDate,
}

impl CommitmentRecord {
    pub fn new(counterparty: &str, total_amount: f64, status: CommitmentStatus, start_date: NaiveDate) -> Self {
        Self {
            counterparty: counterparty.to_string(),
            total_amount,
            status,
            start_date,
        }
    }
}
