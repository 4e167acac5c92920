//! Cash-flow forecast: reconciliation, running balance, problems and summaries

mod breakdown;
mod context;
mod engine;
mod events;
mod problems;
mod projection;
mod reconcile;
mod summary;

pub use breakdown::{Breakdown, BreakdownEntry, BreakdownKey, EntryKind};
pub use context::{QueryBudget, RunContext};
pub use engine::{apply_running_balance, ForecastEngine};
pub use events::{upcoming_events, CashFlowEvent, EventKind};
pub use problems::{detect_problems, Problem, ProblemKind, Severity};
pub use projection::{write_projections_csv, Projection};
pub use reconcile::reconcile_period;
pub use summary::CashFlowSummary;
