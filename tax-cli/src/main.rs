use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::{app, logging, scenarios, session::Session, state::AppState};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare personal and small-business corporate taxation of one income.
///
/// With `--income` the comparison is printed once. With `--batch` every row
/// of a scenario CSV is compared. Otherwise an interactive session starts and
/// recomputes after every line typed.
#[derive(Debug, Parser)]
#[command(name = "tax-compare", version, about)]
struct Cli {
    /// Gross income, e.g. "$200,000". Non-digits are ignored.
    #[arg(long)]
    income: Option<String>,

    /// Personal-expense draw taken as salary. Blank means $100,000.
    #[arg(long, default_value = "")]
    expenses: String,

    /// Include employment-insurance premiums.
    #[arg(long)]
    ei: bool,

    /// Use self-employed pension and credit rules for personal income.
    #[arg(long)]
    self_employed: bool,

    /// TOML file with the jurisdiction rules (defaults to 2024 Manitoba).
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file replacing the federal and/or provincial bracket tables.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// CSV file of scenarios to compare in one run.
    #[arg(long, conflicts_with = "income")]
    batch: Option<PathBuf>,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. "debug" or "tax_core=trace". Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;

    let engine = app::build_engine(cli.config.as_deref(), cli.brackets.as_deref())?;
    let mut stdout = io::stdout().lock();

    if let Some(path) = &cli.batch {
        let scenarios = scenarios::load_from_file(path)
            .with_context(|| format!("Failed to load scenarios: {}", path.display()))?;
        debug!(count = scenarios.len(), "running batch");
        return app::run_batch(&engine, &scenarios, cli.json, &mut stdout);
    }

    let state = AppState::from_text(
        cli.income.as_deref().unwrap_or_default(),
        &cli.expenses,
        cli.ei,
        cli.self_employed,
    );

    if cli.income.is_some() {
        return app::run_once(&engine, &state, cli.json, &mut stdout);
    }

    Session::new(&engine, state, cli.json).run(io::stdin().lock(), &mut stdout)
}
