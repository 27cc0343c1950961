use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EmploymentStatus;

/// Base amount of a non-refundable credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditAmount {
    /// The same amount at every income.
    Fixed { amount: Decimal },

    /// Full `max_amount` up to `phase_out_start`, `min_amount` from
    /// `phase_out_end` on, and a straight line between the two.
    PhasedOut {
        max_amount: Decimal,
        min_amount: Decimal,
        phase_out_start: Decimal,
        phase_out_end: Decimal,
    },
}

impl CreditAmount {
    /// Resolves the credit base for the given reference income.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::CreditAmount;
    ///
    /// let bpa = CreditAmount::PhasedOut {
    ///     max_amount: dec!(15705),
    ///     min_amount: dec!(14156),
    ///     phase_out_start: dec!(173205),
    ///     phase_out_end: dec!(246752),
    /// };
    ///
    /// assert_eq!(bpa.amount_for(dec!(100000)), dec!(15705));
    /// assert_eq!(bpa.amount_for(dec!(300000)), dec!(14156));
    /// ```
    pub fn amount_for(
        &self,
        reference_income: Decimal,
    ) -> Decimal {
        match *self {
            Self::Fixed { amount } => amount,
            Self::PhasedOut {
                max_amount,
                min_amount,
                phase_out_start,
                phase_out_end,
            } => {
                if reference_income <= phase_out_start {
                    return max_amount;
                }
                if reference_income >= phase_out_end {
                    return min_amount;
                }
                let progress =
                    (reference_income - phase_out_start) / (phase_out_end - phase_out_start);
                max_amount - progress * (max_amount - min_amount)
            }
        }
    }
}

/// Who may claim a credit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditEligibility {
    #[default]
    Everyone,
    EmployeesOnly,
}

impl CreditEligibility {
    pub fn admits(
        &self,
        status: EmploymentStatus,
    ) -> bool {
        match self {
            Self::Everyone => true,
            Self::EmployeesOnly => status == EmploymentStatus::Employee,
        }
    }
}

/// A non-refundable credit offsetting tax at `rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRule {
    /// Text shown on the breakdown line, e.g. "Canada employment amount credit".
    pub label: String,
    pub rate: Decimal,
    #[serde(default)]
    pub eligibility: CreditEligibility,
    pub amount: CreditAmount,
}

impl CreditRule {
    pub fn fixed(
        label: impl Into<String>,
        amount: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            rate,
            eligibility: CreditEligibility::Everyone,
            amount: CreditAmount::Fixed { amount },
        }
    }

    pub fn employees_only(mut self) -> Self {
        self.eligibility = CreditEligibility::EmployeesOnly;
        self
    }
}
