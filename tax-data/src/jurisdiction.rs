use std::fs;
use std::path::Path;

use tax_core::{JurisdictionConfig, JurisdictionConfigError};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading a jurisdiction configuration.
#[derive(Debug, Error)]
pub enum JurisdictionLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid jurisdiction configuration: {0}")]
    Invalid(#[from] JurisdictionConfigError),
}

/// Reads and writes [`JurisdictionConfig`] as TOML.
///
/// Monetary amounts and rates are written as strings so they survive the
/// round trip without floating-point loss; bare TOML numbers are accepted on
/// input as well.
pub struct JurisdictionLoader;

impl JurisdictionLoader {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<JurisdictionConfig, JurisdictionLoadError> {
        let config: JurisdictionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a TOML file on disk.
    pub fn load_from_file(
        path: impl AsRef<Path>
    ) -> Result<JurisdictionConfig, JurisdictionLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| JurisdictionLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            jurisdiction = %config.name,
            tax_year = config.tax_year,
            "Jurisdiction configuration loaded"
        );
        Ok(config)
    }

    /// Render a configuration as TOML.
    pub fn to_toml_string(config: &JurisdictionConfig) -> Result<String, JurisdictionLoadError> {
        Ok(toml::to_string_pretty(config)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::CreditAmount;

    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = JurisdictionConfig::manitoba_2024();

        let text = JurisdictionLoader::to_toml_string(&config).unwrap();
        let parsed = JurisdictionLoader::from_toml_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rendered_toml_uses_snake_case_tags() {
        let text = JurisdictionLoader::to_toml_string(&JurisdictionConfig::manitoba_2024()).unwrap();

        assert!(text.contains("name = \"Manitoba\""), "got:\n{text}");
        assert!(text.contains("kind = \"phased_out\""), "got:\n{text}");
        assert!(text.contains("eligibility = \"employees_only\""), "got:\n{text}");
    }

    #[test]
    fn test_parse_accepts_edited_small_business_rate() {
        let text = JurisdictionLoader::to_toml_string(&JurisdictionConfig::manitoba_2024())
            .unwrap()
            .replace("small_business_rate = \"0.11\"", "small_business_rate = \"0.09\"");

        let parsed = JurisdictionLoader::from_toml_str(&text).unwrap();

        assert_eq!(parsed.small_business_rate, dec!(0.09));
        assert_eq!(
            parsed.federal.credits[0].amount,
            CreditAmount::PhasedOut {
                max_amount: dec!(15705),
                min_amount: dec!(14156),
                phase_out_start: dec!(173205),
                phase_out_end: dec!(246752),
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let err = JurisdictionLoader::from_toml_str("tax_year = ").unwrap_err();

        assert!(matches!(err, JurisdictionLoadError::Toml(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_rate() {
        let text = JurisdictionLoader::to_toml_string(&JurisdictionConfig::manitoba_2024())
            .unwrap()
            .replace("small_business_rate = \"0.11\"", "small_business_rate = \"1.5\"");

        let err = JurisdictionLoader::from_toml_str(&text).unwrap_err();

        assert!(matches!(
            err,
            JurisdictionLoadError::Invalid(JurisdictionConfigError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file_reports_path() {
        let err = JurisdictionLoader::load_from_file("does/not/exist.toml").unwrap_err();

        let JurisdictionLoadError::Io { path, .. } = err else {
            panic!("Expected Io error, got: {:?}", err);
        };
        assert_eq!(path, "does/not/exist.toml");
    }
}
