//! CSV loader for batches of comparison scenarios.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name).
//!
//! | Column          | Required | Notes                                              |
//! |-----------------|----------|----------------------------------------------------|
//! | `label`         | yes      | Free text identifying the row                      |
//! | `income`        | yes      | Parsed like typed input: non-digits are dropped    |
//! | `expenses`      | no       | Empty or missing means the default draw of 100,000 |
//! | `ei`            | no       | `yes`/`no`, `on`/`off`, `true`/`false`; default no |
//! | `self_employed` | no       | Same spellings as `ei`; default no                 |
//!
//! ### Example
//!
//! ```csv
//! label,income,expenses,ei,self_employed
//! Resident,"$85,000",,yes,no
//! Family physician,320000,150000,no,yes
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::input::parse_toggle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    income: String,
    #[serde(default)]
    expenses: String,
    #[serde(default)]
    ei: String,
    #[serde(default)]
    self_employed: String,
}

/// Errors that can occur while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised {column} value '{value}' on row {row}")]
    InvalidToggle {
        column: &'static str,
        value: String,
        row: usize,
    },
}

/// One labelled set of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub label: String,
    pub state: AppState,
}

fn toggle_cell(
    column: &'static str,
    value: &str,
    row: usize,
) -> Result<bool, ScenarioLoadError> {
    if value.trim().is_empty() {
        return Ok(false);
    }
    parse_toggle(value).ok_or_else(|| ScenarioLoadError::InvalidToggle {
        column,
        value: value.to_string(),
        row,
    })
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    let include_insurance = toggle_cell("ei", &row.ei, row_number)?;
    let self_employed = toggle_cell("self_employed", &row.self_employed, row_number)?;

    Ok(Scenario {
        label: row.label,
        state: AppState::from_text(&row.income, &row.expenses, include_insurance, self_employed),
    })
}

/// Parse CSV text and return the scenarios in file order.
///
/// # Errors
///
/// * [`ScenarioLoadError::Parse`] if the CSV is structurally invalid or a
///   required column is missing.
/// * [`ScenarioLoadError::InvalidToggle`] if a toggle cell is not a
///   recognised spelling.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a scenario file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
