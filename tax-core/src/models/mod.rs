mod breakdown;
mod contribution_rule;
mod credit_rule;
mod employment_status;
mod jurisdiction_config;
mod scenario_result;
mod tax_bracket;
mod tax_schedule;

pub use breakdown::{BracketDetail, LineItem};
pub use contribution_rule::{
    ContributionRule, ContributionTier, InsuranceConfig, PensionPlanConfig,
};
pub use credit_rule::{CreditAmount, CreditEligibility, CreditRule};
pub use employment_status::EmploymentStatus;
pub use jurisdiction_config::{JurisdictionConfig, JurisdictionConfigError};
pub use scenario_result::{
    Advantage, ComparisonOptions, ComparisonResult, ContributionResult, CorporateResult,
    ScenarioResult,
};
pub use tax_bracket::TaxBracket;
pub use tax_schedule::TaxSchedule;
