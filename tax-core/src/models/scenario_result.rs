use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BracketDetail, EmploymentStatus, LineItem};

/// Pension plan contributions owed on one income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    pub base_tier: Decimal,
    pub additional_tier: Decimal,
    pub total: Decimal,
}

/// Switches the user can toggle between recalculations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonOptions {
    /// Whether employment insurance premiums are charged.
    pub include_insurance: bool,
    /// Status of the taxpayer in the personal-income scenario.
    pub employment_status: EmploymentStatus,
}

/// Income taxed personally: either the whole gross income, or the salary an
/// owner draws from their corporation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub gross_income: Decimal,
    /// Gross income less the pension deductions. May be negative.
    pub taxable_income: Decimal,
    pub federal: BracketDetail,
    pub provincial: BracketDetail,
    pub contributions: ContributionResult,
    pub insurance: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    /// Percentage of gross income, two decimal places.
    pub effective_rate: Decimal,
}

impl ScenarioResult {
    pub fn federal_tax(&self) -> Decimal {
        self.federal.total
    }

    pub fn provincial_tax(&self) -> Decimal {
        self.provincial.total
    }
}

/// Income earned through a small-business corporation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateResult {
    pub gross_income: Decimal,
    pub corporate_tax: Decimal,
    pub after_tax_income: Decimal,
    /// Owner's draw, never more than the after-tax corporate income.
    pub salary: Decimal,
    /// Personal taxation of the salary under employee rules.
    pub salary_taxation: ScenarioResult,
    /// After-tax corporate income not paid out as salary. Treated as
    /// available to the owner without further tax.
    pub retained_earnings: Decimal,
    /// Corporate tax plus all personal tax on the salary.
    pub total_tax: Decimal,
    /// Net salary plus retained earnings.
    pub net_income: Decimal,
    pub effective_rate: Decimal,
    /// Corporate tax lines; empty when there is no income.
    pub breakdown: Vec<LineItem>,
}

impl CorporateResult {
    pub fn salary_tax(&self) -> Decimal {
        self.salary_taxation.total_tax
    }
}

/// Which structure leaves the owner with more money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "favours", rename_all = "snake_case")]
pub enum Advantage {
    /// No gross income, nothing to compare.
    NoIncome,

    /// Incorporating leaves `amount` more.
    Corporate {
        amount: Decimal,
        share_of_income: Decimal,
    },

    /// Staying unincorporated leaves `amount` more, or ties.
    Personal {
        amount: Decimal,
        share_of_income: Decimal,
    },
}

impl Advantage {
    /// Corporate net minus personal net; `None` without income.
    pub fn signed_amount(&self) -> Option<Decimal> {
        match *self {
            Self::NoIncome => None,
            Self::Corporate { amount, .. } => Some(amount),
            Self::Personal { amount, .. } => Some(-amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub options: ComparisonOptions,
    pub personal: ScenarioResult,
    pub corporate: CorporateResult,
    pub advantage: Advantage,
}
