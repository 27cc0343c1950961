//! Non-refundable credits applied after bracket integration.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::{BracketDetail, CreditRule, EmploymentStatus, LineItem};

/// Offsets bracket tax with a schedule's credits.
#[derive(Debug, Clone, Copy)]
pub struct CreditCalculator<'a> {
    rules: &'a [CreditRule],
}

impl<'a> CreditCalculator<'a> {
    pub fn new(rules: &'a [CreditRule]) -> Self {
        Self { rules }
    }

    /// Returns `detail` with one credit line per eligible rule appended and
    /// the total reduced by the credits, never below zero.
    ///
    /// `reference_income` drives income-dependent credits such as a phased-out
    /// basic personal amount. Rules the `status` is not eligible for add no
    /// line. Each credit line shows the full credit even when the tax it
    /// offsets is smaller.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{BracketDetail, CreditRule, EmploymentStatus};
    /// use tax_core::calculations::CreditCalculator;
    ///
    /// let rules = vec![CreditRule::fixed("Basic personal amount credit", dec!(15000), dec!(0.108))];
    /// let detail = BracketDetail { total: dec!(5000), breakdown: Vec::new() };
    ///
    /// let credited = CreditCalculator::new(&rules).apply(
    ///     detail,
    ///     dec!(46000),
    ///     EmploymentStatus::Employee,
    /// );
    ///
    /// // 5,000 - 15,000 × 10.8%
    /// assert_eq!(credited.total, dec!(3380));
    /// assert_eq!(credited.breakdown.len(), 1);
    /// ```
    pub fn apply(
        &self,
        detail: BracketDetail,
        reference_income: Decimal,
        status: EmploymentStatus,
    ) -> BracketDetail {
        let BracketDetail {
            total: pre_credit_total,
            mut breakdown,
        } = detail;

        let mut total_credits = Decimal::ZERO;
        for rule in self.eligible_rules(status) {
            let amount = rule.amount.amount_for(reference_income);
            let credit = amount * rule.rate;
            total_credits += credit;
            breakdown.push(LineItem::Credit {
                label: rule.label.clone(),
                amount,
                tax: -credit,
            });
        }

        if total_credits > pre_credit_total {
            debug!(
                pre_credit_total = %pre_credit_total,
                total_credits = %total_credits,
                "credits exceed tax; net tax clamped to zero"
            );
        }

        BracketDetail {
            total: non_negative(pre_credit_total - total_credits),
            breakdown,
        }
    }

    fn eligible_rules(
        &self,
        status: EmploymentStatus,
    ) -> impl Iterator<Item = &'a CreditRule> {
        self.rules.iter().filter(move |rule| {
            let eligible = rule.eligibility.admits(status);
            if !eligible {
                debug!(credit = %rule.label, status = status.as_str(), "credit not claimable");
            }
            eligible
        })
    }
}

/// Convenience wrapper for a one-off credit application.
pub fn apply_credits(
    detail: BracketDetail,
    reference_income: Decimal,
    rules: &[CreditRule],
    status: EmploymentStatus,
) -> BracketDetail {
    CreditCalculator::new(rules).apply(detail, reference_income, status)
}
