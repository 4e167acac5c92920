//! Persisted projection snapshots
//!
//! A snapshot is keyed by `(projection_date, period_type)`; saving the same
//! key again replaces the earlier snapshot.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::forecast::Projection;
use crate::period::PeriodType;

/// Stored form of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSnapshot {
    pub projection_date: NaiveDate,
    pub period_type: PeriodType,
    pub projected_income: f64,
    pub projected_expenses: f64,
    pub net_flow: f64,
    pub running_balance: f64,
    pub has_deficit: bool,
    /// Display label to amount
    pub income_breakdown: BTreeMap<String, f64>,
    pub expense_breakdown: BTreeMap<String, f64>,
    pub calculated_at: NaiveDateTime,
}

impl ProjectionSnapshot {
    pub fn from_projection(projection: &Projection, calculated_at: NaiveDateTime) -> Self {
        Self {
            projection_date: projection.period.start,
            period_type: projection.period.period_type,
            projected_income: projection.projected_income,
            projected_expenses: projection.projected_expenses,
            net_flow: projection.net_flow,
            running_balance: projection.running_balance,
            has_deficit: projection.has_deficit,
            income_breakdown: projection.income_breakdown.display_map(),
            expense_breakdown: projection.expense_breakdown.display_map(),
            calculated_at,
        }
    }

    pub fn key(&self) -> (NaiveDate, PeriodType) {
        (self.projection_date, self.period_type)
    }
}

/// Destination for projection snapshots
pub trait SnapshotStore {
    /// Insert or replace the snapshot with the same key
    fn upsert(&mut self, snapshot: ProjectionSnapshot) -> Result<()>;

    /// Make upserts durable
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: BTreeMap<(NaiveDate, PeriodType), ProjectionSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate, period_type: PeriodType) -> Option<&ProjectionSnapshot> {
        self.snapshots.get(&(date, period_type))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots ordered by key
    pub fn snapshots(&self) -> impl Iterator<Item = &ProjectionSnapshot> {
        self.snapshots.values()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn upsert(&mut self, snapshot: ProjectionSnapshot) -> Result<()> {
        self.snapshots.insert(snapshot.key(), snapshot);
        Ok(())
    }
}

/// Snapshots kept in a JSON array on disk, rewritten on flush
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    inner: InMemorySnapshotStore,
}

impl JsonSnapshotStore {
    /// Open `path`, loading existing snapshots if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = InMemorySnapshotStore::new();

        if path.exists() {
            let file = File::open(&path)
                .map_err(|e| ForecastError::Persistence(format!("{}: {}", path.display(), e)))?;
            let existing: Vec<ProjectionSnapshot> = serde_json::from_reader(file)
                .map_err(|e| ForecastError::Persistence(format!("{}: {}", path.display(), e)))?;
            for snapshot in existing {
                inner.upsert(snapshot)?;
            }
        }

        Ok(Self { path, inner })
    }

    pub fn store(&self) -> &InMemorySnapshotStore {
        &self.inner
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn upsert(&mut self, snapshot: ProjectionSnapshot) -> Result<()> {
        self.inner.upsert(snapshot)
    }

    fn flush(&mut self) -> Result<()> {
        let snapshots: Vec<&ProjectionSnapshot> = self.inner.snapshots().collect();
        let file = File::create(&self.path)
            .map_err(|e| ForecastError::Persistence(format!("{}: {}", self.path.display(), e)))?;
        serde_json::to_writer_pretty(file, &snapshots)
            .map_err(|e| ForecastError::Persistence(format!("{}: {}", self.path.display(), e)))?;
        log::info!("Wrote {} snapshots to {}", snapshots.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::EntryKind;
    use crate::period::{Period, PeriodTiming};

    fn snapshot_for(running_balance: f64, calculated_at: NaiveDateTime) -> ProjectionSnapshot {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut p = Projection::new(Period::new(start, end, PeriodType::Monthly), PeriodTiming::Current);
        p.income_breakdown.add("Acme", EntryKind::Expected, 300.0);
        p.expected_income = 300.0;
        p.finalize_totals();
        p.running_balance = running_balance;
        ProjectionSnapshot::from_projection(&p, calculated_at)
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let mut store = InMemorySnapshotStore::new();
        store.upsert(snapshot_for(100.0, at(9))).unwrap();
        store.upsert(snapshot_for(250.0, at(10))).unwrap();

        assert_eq!(store.len(), 1);
        let saved = store
            .get(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), PeriodType::Monthly)
            .unwrap();
        assert_eq!(saved.running_balance, 250.0);
        assert_eq!(saved.calculated_at, at(10));
        assert_eq!(saved.income_breakdown.get("Acme (Expected)"), Some(&300.0));
    }

    #[test]
    fn test_json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");

        let mut store = JsonSnapshotStore::open(&path).unwrap();
        store.upsert(snapshot_for(100.0, at(9))).unwrap();
        store.flush().unwrap();

        let reopened = JsonSnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.store().len(), 1);
        assert_eq!(reopened.store().snapshots().next().unwrap().running_balance, 100.0);
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonSnapshotStore::open(&path), Err(ForecastError::Persistence(_))));
    }
}
