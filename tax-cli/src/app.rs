//! Wiring between command-line options, the jurisdiction data and the engine.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tax_core::calculations::TaxComparison;
use tax_core::{ComparisonResult, JurisdictionConfig};
use tax_data::{BracketScheduleLoader, JurisdictionLoader};
use tracing::{debug, info};

use crate::format::{format_currency, format_effective_rate};
use crate::report::{Report, advantage_message};
use crate::scenarios::Scenario;
use crate::session;
use crate::state::AppState;

/// Resolves the jurisdiction rules: the built-in 2024 Manitoba rules, or a
/// TOML file, with bracket tables optionally replaced from a CSV file.
pub fn load_config(
    config_path: Option<&Path>,
    brackets_path: Option<&Path>,
) -> Result<JurisdictionConfig> {
    let mut config = match config_path {
        Some(path) => JurisdictionLoader::load_from_file(path)
            .with_context(|| format!("Failed to load jurisdiction: {}", path.display()))?,
        None => JurisdictionConfig::manitoba_2024(),
    };

    if let Some(path) = brackets_path {
        let records = BracketScheduleLoader::load_from_file(path)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let installed = BracketScheduleLoader::apply_to(&mut config, &records)
            .with_context(|| format!("Brackets in {} are invalid", path.display()))?;
        debug!(installed, path = %path.display(), "bracket tables replaced");
    }

    Ok(config)
}

/// Builds the engine, validating the configuration once.
pub fn build_engine(
    config_path: Option<&Path>,
    brackets_path: Option<&Path>,
) -> Result<TaxComparison> {
    let config = load_config(config_path, brackets_path)?;
    info!(
        jurisdiction = %config.name,
        tax_year = config.tax_year,
        "using jurisdiction rules"
    );
    TaxComparison::new(config).context("Jurisdiction rules failed validation")
}

/// Computes and prints a single comparison.
pub fn run_once<W: Write>(
    engine: &TaxComparison,
    state: &AppState,
    json: bool,
    out: &mut W,
) -> Result<()> {
    session::render(engine, state, json, out)
}

#[derive(Serialize)]
struct BatchEntry<'a> {
    label: &'a str,
    report: Report<'a>,
}

/// Computes every scenario and prints one summary line each, or a JSON array
/// of full reports.
pub fn run_batch<W: Write>(
    engine: &TaxComparison,
    scenarios: &[Scenario],
    json: bool,
    out: &mut W,
) -> Result<()> {
    let results: Vec<ComparisonResult> = scenarios
        .iter()
        .map(|scenario| {
            let state = &scenario.state;
            engine.compare(state.gross_income, state.expenses, &state.options())
        })
        .collect();

    if json {
        let entries: Vec<BatchEntry<'_>> = scenarios
            .iter()
            .zip(&results)
            .map(|(scenario, result)| BatchEntry {
                label: &scenario.label,
                report: Report::new(engine.config(), result),
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries).context("Failed to serialize reports")?;
        writeln!(out, "{text}")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<24}{:>14}{:>14}{:>9}{:>14}{:>9}  Advantage",
        "Scenario", "Gross", "Personal tax", "Rate", "Corp. tax", "Rate"
    )?;
    for (scenario, result) in scenarios.iter().zip(&results) {
        writeln!(
            out,
            "{:<24}{:>14}{:>14}{:>9}{:>14}{:>9}  {}",
            scenario.label,
            format_currency(result.personal.gross_income),
            format_currency(result.personal.total_tax),
            format_effective_rate(result.personal.effective_rate),
            format_currency(result.corporate.total_tax),
            format_effective_rate(result.corporate.effective_rate),
            advantage_message(&result.advantage).headline
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::scenarios;

    #[test]
    fn load_config_defaults_to_built_in_rules() {
        let config = load_config(None, None).unwrap();

        assert_eq!(config, JurisdictionConfig::manitoba_2024());
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Some(Path::new("missing.toml")), None).unwrap_err();

        assert!(
            err.to_string().contains("Failed to load jurisdiction: missing.toml"),
            "{err:#}"
        );
    }

    #[test]
    fn run_once_prints_text_report() {
        let engine = build_engine(None, None).unwrap();
        let state = AppState::from_text("200,000", "", true, false);
        let mut out = Vec::new();

        run_once(&engine, &state, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Corporate structure provides a tax advantage of $21,530"));
    }

    #[test]
    fn batch_prints_one_line_per_scenario() {
        let engine = build_engine(None, None).unwrap();
        let scenarios = scenarios::load_from_str(
            "label,income,expenses,ei\nReference,200000,,yes\nDraw everything,60000,60000,no\n",
        )
        .unwrap();
        let mut out = Vec::new();

        run_batch(&engine, &scenarios, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Reference"));
        assert!(lines[1].contains("36.30%"));
        assert!(lines[1].ends_with("Corporate structure provides a tax advantage of $21,530"));
        assert!(lines[2].contains("Personal income structure provides a tax advantage"));
    }

    #[test]
    fn batch_json_is_an_array_of_labelled_reports() {
        let engine = build_engine(None, None).unwrap();
        let scenarios = scenarios::load_from_str("label,income\nA,0\nB,150000\n").unwrap();
        let mut out = Vec::new();

        run_batch(&engine, &scenarios, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["label"], "A");
        assert_eq!(value[0]["report"]["comparison"]["advantage"]["favours"], "no_income");
        assert_eq!(
            value[1]["report"]["comparison"]["personal"]["gross_income"],
            dec!(150000).to_string()
        );
    }
}
