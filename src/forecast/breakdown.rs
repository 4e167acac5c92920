//! Per-category decomposition of period totals

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where an amount in a breakdown came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Actual,
    Expected,
    Scheduled,
}

impl EntryKind {
    /// Qualifier appended to labels for display, if any
    pub fn qualifier(&self) -> Option<&'static str> {
        match self {
            EntryKind::Actual => None,
            EntryKind::Expected => Some("Expected"),
            EntryKind::Scheduled => Some("Scheduled"),
        }
    }
}

/// Counterparty or category, tagged with its source kind
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreakdownKey {
    pub label: String,
    pub kind: EntryKind,
}

impl BreakdownKey {
    pub fn new(label: &str, kind: EntryKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
        }
    }

    /// e.g. `"Acme (Expected)"`
    pub fn display_label(&self) -> String {
        match self.kind.qualifier() {
            Some(q) => format!("{} ({})", self.label, q),
            None => self.label.clone(),
        }
    }
}

/// Flat form used for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub kind: EntryKind,
    pub amount: f64,
}

/// Ordered map of `{label, kind}` to amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BreakdownEntry>", into = "Vec<BreakdownEntry>")]
pub struct Breakdown {
    entries: BTreeMap<BreakdownKey, f64>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `amount` under `{label, kind}`
    pub fn add(&mut self, label: &str, kind: EntryKind, amount: f64) {
        *self.entries.entry(BreakdownKey::new(label, kind)).or_insert(0.0) += amount;
    }

    pub fn get(&self, label: &str, kind: EntryKind) -> Option<f64> {
        self.entries.get(&BreakdownKey::new(label, kind)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BreakdownKey, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Total of the entries of one kind
    pub fn total_of(&self, kind: EntryKind) -> f64 {
        self.entries
            .iter()
            .filter(|(k, _)| k.kind == kind)
            .map(|(_, v)| v)
            .sum()
    }

    /// Presentation view keyed by qualified display label
    pub fn display_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        for (key, amount) in &self.entries {
            *map.entry(key.display_label()).or_insert(0.0) += amount;
        }
        map
    }
}

impl From<Vec<BreakdownEntry>> for Breakdown {
    fn from(entries: Vec<BreakdownEntry>) -> Self {
        let mut breakdown = Breakdown::new();
        for entry in entries {
            breakdown.add(&entry.label, entry.kind, entry.amount);
        }
        breakdown
    }
}

impl From<Breakdown> for Vec<BreakdownEntry> {
    fn from(breakdown: Breakdown) -> Self {
        breakdown
            .entries
            .into_iter()
            .map(|(key, amount)| BreakdownEntry {
                label: key.label,
                kind: key.kind,
                amount,
            })
            .collect()
    }
}
