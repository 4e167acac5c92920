//! Load ledger records from CSV exports
//!
//! A data directory holds up to four files: `income.csv`, `expenses.csv`,
//! `schedules.csv` and `commitments.csv`. A missing file means no records of
//! that kind.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use super::{
    CommitmentRecord, CommitmentStatus, ExpenseRecord, ExpenseSchedule, ExpenseStatus, Frequency,
    IncomeRecord, PaymentStatus,
};
use crate::error::DataSourceError;
use crate::source::InMemoryLedger;

type LoadResult<T> = Result<T, DataSourceError>;

fn parse_date(field: &str, value: &str) -> LoadResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| DataSourceError::Parse(format!("{} '{}': {}", field, value, e)))
}

fn parse_optional_date(field: &str, value: &Option<String>) -> LoadResult<Option<NaiveDate>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}

/// Raw row of income.csv
#[derive(Debug, serde::Deserialize)]
struct IncomeRow {
    counterparty: String,
    amount: f64,
    paid_amount: Option<f64>,
    status: String,
    due_date: String,
    paid_date: Option<String>,
}

impl IncomeRow {
    fn into_record(self) -> LoadResult<IncomeRecord> {
        let status: PaymentStatus = self.status.parse()?;
        let paid_date = parse_optional_date("paid_date", &self.paid_date)?;
        if status == PaymentStatus::Paid && paid_date.is_none() {
            return Err(DataSourceError::Parse(format!(
                "paid income from {} has no paid_date",
                self.counterparty
            )));
        }
        Ok(IncomeRecord {
            counterparty: self.counterparty,
            amount: self.amount,
            paid_amount: self.paid_amount,
            status,
            due_date: parse_date("due_date", &self.due_date)?,
            paid_date,
        })
    }
}

/// Raw row of expenses.csv
#[derive(Debug, serde::Deserialize)]
struct ExpenseRow {
    category: String,
    amount: f64,
    paid_amount: Option<f64>,
    status: String,
    date: String,
}

impl ExpenseRow {
    fn into_record(self) -> LoadResult<ExpenseRecord> {
        let status: ExpenseStatus = self.status.parse()?;
        Ok(ExpenseRecord {
            category: self.category,
            amount: self.amount,
            paid_amount: self.paid_amount,
            status,
            date: parse_date("date", &self.date)?,
        })
    }
}

/// Raw row of schedules.csv
#[derive(Debug, serde::Deserialize)]
struct ScheduleRow {
    name: String,
    category: String,
    amount: f64,
    frequency: String,
    start_date: String,
    end_date: Option<String>,
    active: Option<bool>,
}

impl ScheduleRow {
    fn into_record(self) -> LoadResult<ExpenseSchedule> {
        let frequency: Frequency = self.frequency.parse()?;
        Ok(ExpenseSchedule {
            name: self.name,
            category: self.category,
            amount: self.amount,
            frequency,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: parse_optional_date("end_date", &self.end_date)?,
            active: self.active.unwrap_or(true),
        })
    }
}

/// Raw row of commitments.csv
#[derive(Debug, serde::Deserialize)]
struct CommitmentRow {
    counterparty: String,
    total_amount: f64,
    status: String,
    start_date: String,
}

impl CommitmentRow {
    fn into_record(self) -> LoadResult<CommitmentRecord> {
        let status: CommitmentStatus = self.status.parse()?;
        Ok(CommitmentRecord {
            counterparty: self.counterparty,
            total_amount: self.total_amount,
            status,
            start_date: parse_date("start_date", &self.start_date)?,
        })
    }
}

macro_rules! csv_loader {
    ($name:ident, $row:ty, $record:ty) => {
        pub fn $name<R: Read>(reader: R) -> LoadResult<Vec<$record>> {
            let mut csv_reader = Reader::from_reader(reader);
            let mut records = Vec::new();

            for result in csv_reader.deserialize() {
                let row: $row = result?;
                records.push(row.into_record()?);
            }

            Ok(records)
        }
    };
}

csv_loader!(load_income, IncomeRow, IncomeRecord);
csv_loader!(load_expenses, ExpenseRow, ExpenseRecord);
csv_loader!(load_schedules, ScheduleRow, ExpenseSchedule);
csv_loader!(load_commitments, CommitmentRow, CommitmentRecord);

fn load_optional<T>(
    dir: &Path,
    file_name: &str,
    load: fn(std::fs::File) -> LoadResult<Vec<T>>,
) -> LoadResult<Vec<T>> {
    let path = dir.join(file_name);
    if !path.exists() {
        log::debug!("{} not found, treating as empty", path.display());
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(&path)?;
    let records = load(file).map_err(|e| match e {
        DataSourceError::Parse(msg) => DataSourceError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Build an in-memory ledger from the CSV files found in `dir`
pub fn load_ledger_dir<P: AsRef<Path>>(dir: P) -> LoadResult<InMemoryLedger> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(DataSourceError::Unavailable(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    Ok(InMemoryLedger {
        payments: load_optional(dir, "income.csv", load_income)?,
        expenses: load_optional(dir, "expenses.csv", load_expenses)?,
        schedules: load_optional(dir, "schedules.csv", load_schedules)?,
        commitments: load_optional(dir, "commitments.csv", load_commitments)?,
    })
}
