//! Integration tests for loading jurisdiction data from the bundled fixtures.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::calculations::TaxComparison;
use tax_core::calculations::common::round_half_up;
use tax_core::{ComparisonOptions, JurisdictionConfig, JurisdictionConfigError, TaxBracket};
use tax_data::{BracketLoadError, BracketScheduleLoader, JurisdictionLoader};

const MANITOBA_TOML: &str = include_str!("../test-data/manitoba_2024.toml");
const BRACKETS_CSV: &str = include_str!("../test-data/brackets_2024.csv");
const FLAT_PROVINCIAL_CSV: &str = include_str!("../test-data/brackets_flat_provincial.csv");
const GAP_CSV: &str = include_str!("../test-data/brackets_gap.csv");

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn test_fixture_toml_matches_built_in_rules() {
    let config = JurisdictionLoader::from_toml_str(MANITOBA_TOML).expect("Failed to parse TOML");

    assert_eq!(config, JurisdictionConfig::manitoba_2024());
}

#[test]
fn test_fixture_toml_keeps_built_in_decimal_scale() {
    // Decimal equality ignores scale; rendered text does not.
    let config = JurisdictionLoader::from_toml_str(MANITOBA_TOML).expect("Failed to parse TOML");

    assert_eq!(
        JurisdictionLoader::to_toml_string(&config).unwrap(),
        JurisdictionLoader::to_toml_string(&JurisdictionConfig::manitoba_2024()).unwrap()
    );
}

#[test]
fn test_load_fixture_toml_from_disk() {
    let config = JurisdictionLoader::load_from_file(fixture("manitoba_2024.toml"))
        .expect("Failed to load TOML");

    assert_eq!(config.name, "Manitoba");
    assert_eq!(config.tax_year, 2024);
    assert_eq!(config.federal.brackets.len(), 5);
    assert_eq!(config.provincial.brackets.len(), 3);
}

#[test]
fn test_fixture_csv_reproduces_built_in_brackets() {
    let records = BracketScheduleLoader::parse(BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");
    let mut config = JurisdictionLoader::from_toml_str(MANITOBA_TOML).unwrap();

    let installed = BracketScheduleLoader::apply_to(&mut config, &records).unwrap();

    assert_eq!(installed, 8);
    assert_eq!(config, JurisdictionConfig::manitoba_2024());
}

#[test]
fn test_flat_provincial_schedule_changes_provincial_tax_only() {
    let records = BracketScheduleLoader::load_from_file(fixture("brackets_flat_provincial.csv"))
        .expect("Failed to load CSV");
    assert_eq!(
        BracketScheduleLoader::parse(FLAT_PROVINCIAL_CSV.as_bytes()).unwrap(),
        records
    );

    let mut config = JurisdictionConfig::manitoba_2024();
    BracketScheduleLoader::apply_to(&mut config, &records).unwrap();
    assert_eq!(
        config.provincial.brackets,
        vec![TaxBracket::new(dec!(0), None, dec!(0.10))]
    );

    let engine = TaxComparison::new(config).unwrap();
    let result = engine.personal_scenario(dec!(50000), Default::default(), false);

    // Taxable 49,162 at a flat 10% less 10.8% of (15,000 + 3,217.50)
    assert_eq!(result.provincial_tax(), dec!(4916.2) - dec!(1967.49));
    // Federal side is unchanged from the built-in rules
    assert_eq!(result.federal_tax(), dec!(4320.975));
}

#[test]
fn test_gap_in_csv_is_rejected() {
    let records = BracketScheduleLoader::parse(GAP_CSV.as_bytes()).unwrap();
    let mut config = JurisdictionConfig::manitoba_2024();

    let err = BracketScheduleLoader::apply_to(&mut config, &records).unwrap_err();

    let BracketLoadError::Invalid(JurisdictionConfigError::NonContiguousBracket {
        schedule,
        index,
        expected,
        found,
    }) = err
    else {
        panic!("Expected NonContiguousBracket error, got: {:?}", err);
    };
    assert_eq!(schedule, "Federal");
    assert_eq!(index, 1);
    assert_eq!(expected, dec!(55867));
    assert_eq!(found, dec!(60000));
}

#[test]
fn test_loaded_config_reproduces_reference_comparison() {
    let config = JurisdictionLoader::load_from_file(fixture("manitoba_2024.toml")).unwrap();
    let engine = TaxComparison::new(config).unwrap();
    let options = ComparisonOptions {
        include_insurance: true,
        ..Default::default()
    };

    let result = engine.compare(dec!(200000), dec!(100000), &options);

    assert_eq!(round_half_up(result.personal.total_tax, 2), dec!(72596.33));
    assert_eq!(round_half_up(result.corporate.total_tax, 2), dec!(51065.99));
}
