//! Public pension plan contributions and employment insurance premiums.
//!
//! # Tiers
//!
//! | Tier       | Pensionable earnings                          | Contribution              |
//! |------------|-----------------------------------------------|---------------------------|
//! | Base       | `min(income, base ceiling) - exemption floor` | `min(earnings × rate, max)` |
//! | Additional | `min(income, second ceiling) - base ceiling`  | `min(earnings × rate, max)` |
//!
//! Pensionable earnings below zero count as zero. Self-employed payers use a
//! separate rule with both the employee and employer shares, and deduct the
//! employer half from taxable income.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::{
    ContributionResult, ContributionRule, ContributionTier, EmploymentStatus, InsuranceConfig,
    PensionPlanConfig,
};

/// Computes contributions, premiums and the resulting taxable income.
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator<'a> {
    pension: &'a PensionPlanConfig,
    insurance: &'a InsuranceConfig,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(
        pension: &'a PensionPlanConfig,
        insurance: &'a InsuranceConfig,
    ) -> Self {
        Self { pension, insurance }
    }

    /// Pension contributions on `income` under the rule for `status`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{EmploymentStatus, JurisdictionConfig};
    /// use tax_core::calculations::ContributionCalculator;
    ///
    /// let config = JurisdictionConfig::manitoba_2024();
    /// let calculator = ContributionCalculator::new(&config.pension, &config.insurance);
    ///
    /// let result = calculator.compute(dec!(70000), EmploymentStatus::Employee);
    ///
    /// // Base tier capped at 3,867.50; 1,500 × 4% in the additional tier
    /// assert_eq!(result.base_tier, dec!(3867.50));
    /// assert_eq!(result.additional_tier, dec!(60));
    /// assert_eq!(result.total, dec!(3927.50));
    /// ```
    pub fn compute(
        &self,
        income: Decimal,
        status: EmploymentStatus,
    ) -> ContributionResult {
        let rule = self.pension.rule_for(status);

        let base_tier = self.tier_contribution(&rule.base, income);
        let additional_tier = self.tier_contribution(&rule.additional, income);

        debug!(
            income = %income,
            status = status.as_str(),
            base_tier = %base_tier,
            additional_tier = %additional_tier,
            "pension contributions"
        );

        ContributionResult {
            base_tier,
            additional_tier,
            total: base_tier + additional_tier,
        }
    }

    /// Gross income less the pension deductions for `status`.
    ///
    /// Every payer deducts the fixed enhanced-contribution allowance. A
    /// self-employed payer also deducts the employer half of
    /// `contributions.total`. The result may be negative for small incomes.
    pub fn taxable_income(
        &self,
        gross_income: Decimal,
        status: EmploymentStatus,
        contributions: &ContributionResult,
    ) -> Decimal {
        let rule: &ContributionRule = self.pension.rule_for(status);
        gross_income
            - contributions.total * rule.employer_share_deduction
            - self.pension.enhanced_deduction
    }

    /// Employment insurance premium, or zero when not `included`.
    ///
    /// Uses employee rules whatever the payer's status.
    pub fn insurance_premium(
        &self,
        income: Decimal,
        included: bool,
    ) -> Decimal {
        if !included {
            return Decimal::ZERO;
        }
        non_negative(income * self.insurance.rate).min(self.insurance.max_premium)
    }

    fn tier_contribution(
        &self,
        tier: &ContributionTier,
        income: Decimal,
    ) -> Decimal {
        let pensionable = non_negative(income.min(tier.ceiling) - tier.floor);
        (pensionable * tier.rate).min(tier.max_contribution)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::JurisdictionConfig;

    fn with_calculator<T>(f: impl FnOnce(ContributionCalculator<'_>) -> T) -> T {
        let config = JurisdictionConfig::manitoba_2024();
        f(ContributionCalculator::new(&config.pension, &config.insurance))
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_is_zero_below_exemption_floor() {
        let result = with_calculator(|c| c.compute(dec!(3500), EmploymentStatus::Employee));

        assert_eq!(result, ContributionResult::default());
    }

    #[test]
    fn compute_is_zero_for_negative_income() {
        let result = with_calculator(|c| c.compute(dec!(-1000), EmploymentStatus::SelfEmployed));

        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn compute_employee_base_tier_only() {
        let result = with_calculator(|c| c.compute(dec!(50000), EmploymentStatus::Employee));

        // (50,000 - 3,500) × 5.95%
        assert_eq!(result.base_tier, dec!(2766.75));
        assert_eq!(result.additional_tier, Decimal::ZERO);
        assert_eq!(result.total, dec!(2766.75));
    }

    #[test]
    fn compute_employee_caps_both_tiers() {
        let result = with_calculator(|c| c.compute(dec!(200000), EmploymentStatus::Employee));

        assert_eq!(result.base_tier, dec!(3867.50));
        assert_eq!(result.additional_tier, dec!(188.00));
        assert_eq!(result.total, dec!(4055.50));
    }

    #[test]
    fn compute_self_employed_doubles_rates_and_caps() {
        let result = with_calculator(|c| c.compute(dec!(200000), EmploymentStatus::SelfEmployed));

        assert_eq!(result.base_tier, dec!(7735.00));
        assert_eq!(result.additional_tier, dec!(376.00));
        assert_eq!(result.total, dec!(8111.00));
    }

    #[test]
    fn compute_self_employed_below_ceiling() {
        let result = with_calculator(|c| c.compute(dec!(50000), EmploymentStatus::SelfEmployed));

        // (50,000 - 3,500) × 11.9%
        assert_eq!(result.base_tier, dec!(5533.50));
        assert_eq!(result.additional_tier, Decimal::ZERO);
    }

    #[test]
    fn compute_additional_tier_partially_filled() {
        let result = with_calculator(|c| c.compute(dec!(71000), EmploymentStatus::SelfEmployed));

        // (71,000 - 68,500) × 8%
        assert_eq!(result.additional_tier, dec!(200));
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_for_employee_deducts_enhanced_allowance_only() {
        let taxable = with_calculator(|c| {
            let contributions = c.compute(dec!(200000), EmploymentStatus::Employee);
            c.taxable_income(dec!(200000), EmploymentStatus::Employee, &contributions)
        });

        assert_eq!(taxable, dec!(199162));
    }

    #[test]
    fn taxable_income_for_self_employed_deducts_employer_half() {
        let taxable = with_calculator(|c| {
            let contributions = c.compute(dec!(200000), EmploymentStatus::SelfEmployed);
            c.taxable_income(dec!(200000), EmploymentStatus::SelfEmployed, &contributions)
        });

        // 200,000 - 8,111 / 2 - 838
        assert_eq!(taxable, dec!(195106.50));
    }

    #[test]
    fn taxable_income_can_go_negative() {
        let taxable = with_calculator(|c| {
            let contributions = c.compute(Decimal::ZERO, EmploymentStatus::Employee);
            c.taxable_income(Decimal::ZERO, EmploymentStatus::Employee, &contributions)
        });

        assert_eq!(taxable, dec!(-838));
    }

    // =========================================================================
    // insurance_premium tests
    // =========================================================================

    #[test]
    fn insurance_premium_is_zero_when_excluded() {
        let premium = with_calculator(|c| c.insurance_premium(dec!(200000), false));

        assert_eq!(premium, Decimal::ZERO);
    }

    #[test]
    fn insurance_premium_below_cap() {
        let premium = with_calculator(|c| c.insurance_premium(dec!(50000), true));

        // 50,000 × 1.66%
        assert_eq!(premium, dec!(830));
    }

    #[test]
    fn insurance_premium_is_capped() {
        let premium = with_calculator(|c| c.insurance_premium(dec!(200000), true));

        assert_eq!(premium, dec!(1049.12));
    }
}
