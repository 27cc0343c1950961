use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EmploymentStatus;

/// One segment of pensionable earnings with its own rate and cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTier {
    /// Earnings at or below this amount contribute nothing to the tier.
    pub floor: Decimal,
    /// Earnings above this amount contribute nothing to the tier.
    pub ceiling: Decimal,
    pub rate: Decimal,
    pub max_contribution: Decimal,
}

/// Base and additional pension tiers for one kind of payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    /// Share of the total contribution deducted from taxable income.
    ///
    /// Zero for employees. One half for self-employed payers, who deduct the
    /// employer share they remit on their own behalf.
    pub employer_share_deduction: Decimal,
    pub base: ContributionTier,
    /// Second tier; its floor is the base tier's ceiling.
    pub additional: ContributionTier,
}

impl ContributionRule {
    /// Largest combined contribution the rule can produce.
    pub fn max_total(&self) -> Decimal {
        self.base.max_contribution + self.additional.max_contribution
    }
}

/// Public pension plan parameters for both kinds of payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionPlanConfig {
    /// Fixed enhanced-contribution allowance deducted from gross income for
    /// every payer before bracket integration.
    pub enhanced_deduction: Decimal,
    pub employee: ContributionRule,
    pub self_employed: ContributionRule,
}

impl PensionPlanConfig {
    pub fn rule_for(
        &self,
        status: EmploymentStatus,
    ) -> &ContributionRule {
        match status {
            EmploymentStatus::Employee => &self.employee,
            EmploymentStatus::SelfEmployed => &self.self_employed,
        }
    }
}

/// Employment insurance premium parameters.
///
/// Always computed with employee rules; self-employed payers opt in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceConfig {
    pub rate: Decimal,
    pub max_premium: Decimal,
}
