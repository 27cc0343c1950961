//! Personal income vs. small-business corporation comparison.
//!
//! # Scenarios
//!
//! | Scenario  | Steps |
//! |-----------|-------|
//! | Personal  | contributions on gross → taxable income → federal and provincial brackets and credits → insurance |
//! | Corporate | flat small-business tax → salary = min(draw, after-tax income) → salary taxed as above with employee rules → remainder retained |
//!
//! The advantage is the corporate net outcome minus the personal one. Retained
//! corporate earnings are counted as available to the owner without any
//! further tax on distribution.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Advantage, ComparisonOptions, JurisdictionConfig};
//! use tax_core::calculations::TaxComparison;
//!
//! let engine = TaxComparison::new(JurisdictionConfig::manitoba_2024()).unwrap();
//! let options = ComparisonOptions { include_insurance: true, ..Default::default() };
//!
//! let result = engine.compare(dec!(200000), dec!(100000), &options);
//!
//! assert_eq!(result.corporate.salary, dec!(100000));
//! assert_eq!(result.corporate.retained_earnings, dec!(78000));
//! assert!(matches!(result.advantage, Advantage::Corporate { .. }));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{effective_rate, non_negative, percentage_of};
use crate::calculations::{BracketIntegrator, ContributionCalculator, CreditCalculator};
use crate::{
    Advantage, BracketDetail, ComparisonOptions, ComparisonResult, CorporateResult,
    EmploymentStatus, JurisdictionConfig, JurisdictionConfigError, LineItem, ScenarioResult,
    TaxSchedule,
};

/// Label of the single corporate breakdown line.
pub const ACTIVE_BUSINESS_INCOME: &str = "Active business income";

/// The comparison engine for one validated jurisdiction.
///
/// Immutable once built; every call recomputes from scratch.
#[derive(Debug, Clone)]
pub struct TaxComparison {
    config: JurisdictionConfig,
}

impl TaxComparison {
    /// Builds the engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`JurisdictionConfigError`] if the bracket tables, credits or
    /// contribution rules are malformed.
    pub fn new(config: JurisdictionConfig) -> Result<Self, JurisdictionConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Runs both scenarios for the given inputs.
    ///
    /// Negative inputs are treated as zero. Without gross income the
    /// advantage is [`Advantage::NoIncome`].
    pub fn compare(
        &self,
        gross_income: Decimal,
        personal_expense_draw: Decimal,
        options: &ComparisonOptions,
    ) -> ComparisonResult {
        let gross_income = self.clamp_input("gross_income", gross_income);
        let personal_expense_draw =
            self.clamp_input("personal_expense_draw", personal_expense_draw);

        let personal = self.personal_scenario(
            gross_income,
            options.employment_status,
            options.include_insurance,
        );
        let corporate =
            self.corporate_scenario(gross_income, personal_expense_draw, options.include_insurance);
        let advantage = self.advantage(gross_income, &personal, &corporate);

        debug!(
            gross_income = %gross_income,
            personal_net = %personal.net_income,
            corporate_net = %corporate.net_income,
            advantage = ?advantage,
            "comparison complete"
        );

        ComparisonResult {
            options: *options,
            personal,
            corporate,
            advantage,
        }
    }

    /// Personal taxation of `gross_income` under `status`.
    pub fn personal_scenario(
        &self,
        gross_income: Decimal,
        status: EmploymentStatus,
        include_insurance: bool,
    ) -> ScenarioResult {
        let contributions = self.contributions();

        let pension = contributions.compute(gross_income, status);
        let taxable_income = contributions.taxable_income(gross_income, status, &pension);
        let federal = self.regime_tax(&self.config.federal, taxable_income, status);
        let provincial = self.regime_tax(&self.config.provincial, taxable_income, status);
        let insurance = contributions.insurance_premium(gross_income, include_insurance);

        let total_tax = federal.total + provincial.total + pension.total + insurance;
        let net_income = gross_income - total_tax;

        debug!(
            gross_income = %gross_income,
            status = status.as_str(),
            taxable_income = %taxable_income,
            federal_tax = %federal.total,
            provincial_tax = %provincial.total,
            total_tax = %total_tax,
            "personal scenario"
        );

        ScenarioResult {
            gross_income,
            taxable_income,
            federal,
            provincial,
            contributions: pension,
            insurance,
            total_tax,
            net_income,
            effective_rate: effective_rate(total_tax, gross_income),
        }
    }

    /// Corporate taxation of `gross_income` with an owner's draw.
    ///
    /// The salary never exceeds the after-tax corporate income and is always
    /// taxed under employee rules.
    pub fn corporate_scenario(
        &self,
        gross_income: Decimal,
        personal_expense_draw: Decimal,
        include_insurance: bool,
    ) -> CorporateResult {
        let rate = self.config.small_business_rate;
        let corporate_tax = gross_income * rate;
        let after_tax_income = gross_income - corporate_tax;
        let salary = personal_expense_draw.min(after_tax_income);

        let salary_taxation =
            self.personal_scenario(salary, EmploymentStatus::Employee, include_insurance);
        let retained_earnings = after_tax_income - salary;
        let total_tax = corporate_tax + salary_taxation.total_tax;
        let net_income = salary_taxation.net_income + retained_earnings;

        let breakdown = if gross_income > Decimal::ZERO {
            vec![LineItem::Flat {
                label: ACTIVE_BUSINESS_INCOME.to_string(),
                amount: gross_income,
                rate,
                tax: corporate_tax,
            }]
        } else {
            Vec::new()
        };

        debug!(
            corporate_tax = %corporate_tax,
            salary = %salary,
            retained_earnings = %retained_earnings,
            total_tax = %total_tax,
            "corporate scenario"
        );

        CorporateResult {
            gross_income,
            corporate_tax,
            after_tax_income,
            salary,
            salary_taxation,
            retained_earnings,
            total_tax,
            net_income,
            effective_rate: effective_rate(total_tax, gross_income),
            breakdown,
        }
    }

    fn contributions(&self) -> ContributionCalculator<'_> {
        ContributionCalculator::new(&self.config.pension, &self.config.insurance)
    }

    fn regime_tax(
        &self,
        schedule: &TaxSchedule,
        taxable_income: Decimal,
        status: EmploymentStatus,
    ) -> BracketDetail {
        let detail = BracketIntegrator::new(&schedule.brackets).integrate(taxable_income);
        CreditCalculator::new(&schedule.credits).apply(detail, taxable_income, status)
    }

    fn advantage(
        &self,
        gross_income: Decimal,
        personal: &ScenarioResult,
        corporate: &CorporateResult,
    ) -> Advantage {
        if gross_income <= Decimal::ZERO {
            return Advantage::NoIncome;
        }

        let difference = corporate.net_income - personal.net_income;
        let amount = difference.abs();
        let share_of_income = percentage_of(amount, gross_income);

        if difference > Decimal::ZERO {
            Advantage::Corporate {
                amount,
                share_of_income,
            }
        } else {
            Advantage::Personal {
                amount,
                share_of_income,
            }
        }
    }

    fn clamp_input(
        &self,
        field: &'static str,
        value: Decimal,
    ) -> Decimal {
        if value < Decimal::ZERO {
            warn!(field, value = %value, "negative input treated as zero");
        }
        non_negative(value)
    }
}
