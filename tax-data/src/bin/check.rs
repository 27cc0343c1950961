use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{CreditAmount, JurisdictionConfig, TaxSchedule};
use tax_data::{BracketScheduleLoader, JurisdictionLoader};
use tracing_subscriber::EnvFilter;

/// Validate jurisdiction data files and summarize the resulting rules.
///
/// Without `--config` the built-in 2024 Manitoba rules are checked. The
/// optional CSV file has the columns:
/// - schedule: `federal` or `provincial`
/// - min_income: The lower bound of the bracket
/// - max_income: The upper bound (empty for the top bracket)
/// - rate: The marginal rate as a decimal (e.g., 0.15)
#[derive(Parser, Debug)]
#[command(name = "jurisdiction-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML jurisdiction configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a CSV file replacing the bracket tables
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Print the effective configuration as TOML after validation
    #[arg(short, long, default_value_t = false)]
    print: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            println!("Loading jurisdiction from: {}", path.display());
            JurisdictionLoader::load_from_file(path)
                .with_context(|| format!("Failed to load: {}", path.display()))?
        }
        None => {
            println!("Using built-in jurisdiction rules.");
            let config = JurisdictionConfig::manitoba_2024();
            config.validate().context("Built-in rules failed validation")?;
            config
        }
    };

    if let Some(path) = &args.brackets {
        println!("Loading brackets from: {}", path.display());
        let records = BracketScheduleLoader::load_from_file(path)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} records from CSV", records.len());

        BracketScheduleLoader::apply_to(&mut config, &records)
            .with_context(|| format!("Brackets in {} are invalid", path.display()))?;
    }

    println!();
    println!("{} ({})", config.name, config.tax_year);
    print_schedule(&config.federal);
    print_schedule(&config.provincial);
    println!(
        "  Pension: employee max {}, self-employed max {}, enhanced deduction {}",
        config.pension.employee.max_total(),
        config.pension.self_employed.max_total(),
        config.pension.enhanced_deduction
    );
    println!(
        "  Insurance: rate {}, max premium {}",
        config.insurance.rate, config.insurance.max_premium
    );
    println!("  Small-business rate: {}", config.small_business_rate);

    if args.print {
        println!();
        let text = JurisdictionLoader::to_toml_string(&config)
            .context("Failed to render configuration")?;
        print!("{text}");
    }

    println!();
    println!("Configuration is valid.");

    Ok(())
}

fn print_schedule(schedule: &TaxSchedule) {
    println!("  {} brackets:", schedule.name);
    for bracket in &schedule.brackets {
        match bracket.max_income {
            Some(max) => println!("    {} - {} @ {}", bracket.min_income, max, bracket.tax_rate),
            None => println!("    {}+ @ {}", bracket.min_income, bracket.tax_rate),
        }
    }

    println!("  {} credits:", schedule.name);
    for credit in &schedule.credits {
        let amount = match &credit.amount {
            CreditAmount::Fixed { amount } => amount.to_string(),
            CreditAmount::PhasedOut {
                max_amount,
                min_amount,
                ..
            } => format!("{max_amount} -> {min_amount}"),
        };
        println!("    {} ({amount} @ {})", credit.label, credit.rate);
    }
}
