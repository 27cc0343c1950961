use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{JurisdictionConfig, JurisdictionConfigError, TaxBracket};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket schedules.
#[derive(Debug, Error)]
pub enum BracketLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0} (expected 'federal' or 'provincial')")]
    InvalidSchedule(String),

    #[error("Loaded brackets do not form a valid configuration: {0}")]
    Invalid(#[from] JurisdictionConfigError),
}

impl From<csv::Error> for BracketLoadError {
    fn from(err: csv::Error) -> Self {
        BracketLoadError::CsvParse(err.to_string())
    }
}

/// Which progressive schedule of a jurisdiction a CSV row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduleKind {
    Federal,
    Provincial,
}

impl ScheduleKind {
    pub fn parse(value: &str) -> Result<Self, BracketLoadError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "federal" => Ok(Self::Federal),
            "provincial" => Ok(Self::Provincial),
            _ => Err(BracketLoadError::InvalidSchedule(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::Provincial => "provincial",
        }
    }
}

/// A single record from a bracket CSV file.
///
/// - `schedule`: `federal` or `provincial`
/// - `min_income`: lower bound of the bracket
/// - `max_income`: upper bound of the bracket (empty for the top bracket)
/// - `rate`: the marginal rate as a decimal (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl BracketRecord {
    fn to_bracket(&self) -> TaxBracket {
        TaxBracket::new(self.min_income, self.max_income, self.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for federal and provincial bracket tables from CSV files.
///
/// Rows may appear in any order; each schedule's rows are sorted by
/// `min_income` before they replace the configured table. A schedule with no
/// rows in the file keeps its existing brackets.
pub struct BracketScheduleLoader;

impl BracketScheduleLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse bracket records from a CSV file on disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<BracketRecord>, BracketLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BracketLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }

    /// Replace the bracket tables of `config` with the given records.
    ///
    /// The configuration is validated afterwards and left untouched when
    /// either a schedule name is unknown or the resulting tables are invalid.
    /// Returns the number of brackets installed.
    pub fn apply_to(
        config: &mut JurisdictionConfig,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoadError> {
        let mut groups: BTreeMap<ScheduleKind, Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            let kind = ScheduleKind::parse(&record.schedule)?;
            groups.entry(kind).or_default().push(record.to_bracket());
        }

        let mut candidate = config.clone();
        let mut installed = 0;

        for (kind, mut brackets) in groups {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            debug!(schedule = kind.as_str(), brackets = brackets.len(), "Replacing bracket table");
            installed += brackets.len();

            match kind {
                ScheduleKind::Federal => candidate.federal.brackets = brackets,
                ScheduleKind::Provincial => candidate.provincial.brackets = brackets,
            }
        }

        candidate.validate()?;
        *config = candidate;

        info!(installed, "Bracket tables loaded");
        Ok(installed)
    }
}
