//! Cash Flow Forecast CLI
//!
//! Command-line interface for running cash-flow projections over CSV ledger exports

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use cashflow_forecast::forecast::write_projections_csv;
use cashflow_forecast::records::load_ledger_dir;
use cashflow_forecast::snapshot::JsonSnapshotStore;
use cashflow_forecast::{ForecastConfig, ForecastEngine, InMemoryLedger, PeriodType};

#[derive(Debug, Parser)]
#[command(name = "cashflow_forecast", version, about = "Project cash position over a date range")]
struct Cli {
    /// Directory holding income.csv, expenses.csv, schedules.csv, commitments.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference date for past/current/future (default: today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Cash on hand before the first period
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    starting_balance: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print period-by-period projections
    Project {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// daily, weekly or monthly
        #[arg(long, default_value = "monthly")]
        cadence: PeriodType,
        /// Write all rows to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Upsert snapshots into this JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Totals and averages over monthly periods
    Summary {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Negative balances and large deficits over monthly periods
    Problems {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Upcoming scheduled expenses and pending income
    Events {
        /// Lookahead window in days (default from config)
        #[arg(long)]
        days: Option<u32>,
    },
}

fn build_engine(cli: &Cli) -> Result<ForecastEngine<InMemoryLedger>> {
    let config = match &cli.config {
        Some(path) => ForecastConfig::from_json_path(path)?,
        None => ForecastConfig::default(),
    };
    let ledger = load_ledger_dir(&cli.data_dir)
        .with_context(|| format!("loading ledger from {}", cli.data_dir.display()))?;

    let mut engine = ForecastEngine::new(ledger, config).with_starting_balance(cli.starting_balance);
    if let Some(today) = cli.today {
        engine = engine.with_today(today);
    }
    Ok(engine)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let engine = build_engine(&cli)?;

    match &cli.command {
        Command::Project { from, to, cadence, output, save } => {
            let projections = match save {
                Some(path) => {
                    let mut store = JsonSnapshotStore::open(path)?;
                    engine.generate_and_save_projections(*from, *to, *cadence, &mut store)?
                }
                None => engine.generate_projections(*from, *to, *cadence)?,
            };

            println!("Starting balance: {:.2}\n", engine.starting_balance());
            println!(
                "{:<10} {:<10} {:<7} {:>12} {:>12} {:>12} {:>14}",
                "Start", "End", "Timing", "Income", "Expenses", "Net", "Balance"
            );
            println!("{}", "-".repeat(84));
            for p in &projections {
                println!(
                    "{:<10} {:<10} {:<7} {:>12.2} {:>12.2} {:>12.2} {:>14.2}{}",
                    p.period.start,
                    p.period.end,
                    p.timing,
                    p.projected_income,
                    p.projected_expenses,
                    p.net_flow,
                    p.running_balance,
                    if p.running_balance < 0.0 { "  !" } else { "" },
                );
            }

            if let Some(path) = output {
                let file =
                    File::create(path).with_context(|| format!("creating {}", path.display()))?;
                write_projections_csv(file, &projections)?;
                println!("\nFull results written to: {}", path.display());
            }
        }
        Command::Summary { from, to } => {
            let summary = engine.cash_flow_summary(*from, *to)?;
            if summary.is_empty() {
                println!("No periods in range; balance stays at {:.2}", summary.final_balance);
                return Ok(());
            }
            println!("Summary ({} periods):", summary.period_count);
            println!("  Starting Balance:       {:>14.2}", summary.starting_balance);
            println!("  Total Income:           {:>14.2}", summary.total_projected_income);
            println!("  Total Expenses:         {:>14.2}", summary.total_projected_expenses);
            println!("  Net Cash Flow:          {:>14.2}", summary.net_cash_flow);
            println!("  Avg Monthly Income:     {:>14.2}", summary.average_monthly_income);
            println!("  Avg Monthly Expenses:   {:>14.2}", summary.average_monthly_expenses);
            println!("  Signed Commitments:     {:>14.2}", summary.total_actual_commitments);
            println!("  Draft Commitments:      {:>14.2}", summary.total_expected_commitments);
            println!("  Deficit Periods:        {:>14}", summary.periods_with_deficit);
            println!("  Lowest Balance:         {:>14.2}", summary.lowest_balance);
            println!("  Final Balance:          {:>14.2}", summary.final_balance);
        }
        Command::Problems { from, to } => {
            let problems = engine.identify_cash_flow_problems(*from, *to)?;
            if problems.is_empty() {
                println!("No cash flow problems found.");
            }
            for problem in &problems {
                println!(
                    "[{:?}] {}  {:>12.2}  {}",
                    problem.severity, problem.date, problem.amount, problem.message
                );
            }
        }
        Command::Events { days } => {
            let days = days.unwrap_or(engine.config().upcoming_days);
            let events = engine.upcoming_cash_flow_events(days)?;
            println!("Upcoming events ({} days from {}):", days, engine.today());
            for event in &events {
                println!(
                    "  {}  {:<8} {:>12.2}  {}",
                    event.date,
                    format!("{:?}", event.kind),
                    event.amount,
                    event.label
                );
            }
        }
    }

    Ok(())
}
