//! Progressive bracket integration.
//!
//! Income is walked up through the brackets of a schedule, lowest first. Each
//! bracket taxes the portion of the remaining income that fits inside it, and
//! the walk stops as soon as the income is used up, so brackets above the
//! income never appear in the breakdown.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracket;
//! use tax_core::calculations::BracketIntegrator;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), Some(dec!(47000)), dec!(0.108)),
//!     TaxBracket::new(dec!(47000), Some(dec!(100000)), dec!(0.1275)),
//!     TaxBracket::new(dec!(100000), None, dec!(0.174)),
//! ];
//!
//! let detail = BracketIntegrator::new(&brackets).integrate(dec!(60000));
//!
//! // 47,000 × 10.8% + 13,000 × 12.75%
//! assert_eq!(detail.total, dec!(6733.50));
//! assert_eq!(detail.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::{BracketDetail, LineItem, TaxBracket};

/// Applies one marginal-rate schedule to income amounts.
///
/// Brackets must be sorted by `min_income`, contiguous, start at zero and end
/// with a single unbounded bracket; [`crate::JurisdictionConfig::validate`]
/// checks this.
#[derive(Debug, Clone, Copy)]
pub struct BracketIntegrator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketIntegrator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Computes tax on `income` and the per-bracket lines behind it.
    ///
    /// Non-positive income yields a zero total and an empty breakdown.
    pub fn integrate(
        &self,
        income: Decimal,
    ) -> BracketDetail {
        if income <= Decimal::ZERO {
            if income < Decimal::ZERO {
                debug!(income = %income, "taxable income is negative; no bracket tax applies");
            }
            return BracketDetail::default();
        }

        let mut remaining = income;
        let mut total = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for bracket in self.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }

            let portion = self.taxable_portion(bracket, remaining);
            if portion > Decimal::ZERO {
                let tax = portion * bracket.tax_rate;
                total += tax;
                breakdown.push(LineItem::Bracket {
                    min_income: bracket.min_income,
                    max_income: bracket.max_income,
                    amount: portion,
                    rate: bracket.tax_rate,
                    tax,
                });
                remaining -= portion;
            }
        }

        BracketDetail { total, breakdown }
    }

    /// Part of `remaining` that falls inside `bracket`.
    fn taxable_portion(
        &self,
        bracket: &TaxBracket,
        remaining: Decimal,
    ) -> Decimal {
        let capped = match bracket.span() {
            Some(span) => remaining.min(span),
            None => remaining,
        };
        non_negative(capped)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::JurisdictionConfig;

    fn federal_brackets() -> Vec<TaxBracket> {
        JurisdictionConfig::manitoba_2024().federal.brackets
    }

    fn bracket_amounts(detail: &BracketDetail) -> Vec<Decimal> {
        detail.breakdown.iter().map(LineItem::amount).collect()
    }

    #[test]
    fn integrate_returns_empty_detail_for_zero_income() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(Decimal::ZERO);

        assert_eq!(detail, BracketDetail::default());
    }

    #[test]
    fn integrate_returns_empty_detail_for_negative_income() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(-838));

        assert_eq!(detail.total, Decimal::ZERO);
        assert!(detail.breakdown.is_empty());
    }

    #[test]
    fn integrate_taxes_income_inside_first_bracket() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(49162));

        // 49,162 × 15%
        assert_eq!(detail.total, dec!(7374.30));
        assert_eq!(
            detail.breakdown,
            vec![LineItem::Bracket {
                min_income: dec!(0),
                max_income: Some(dec!(55867)),
                amount: dec!(49162),
                rate: dec!(0.15),
                tax: dec!(7374.30),
            }]
        );
    }

    #[test]
    fn integrate_fills_lower_brackets_before_higher_ones() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(199162));

        assert_eq!(
            bracket_amounts(&detail),
            vec![dec!(55867), dec!(55866), dec!(61472), dec!(25957)]
        );
        // 8,380.05 + 11,452.53 + 15,982.72 + 7,527.53
        assert_eq!(detail.total, dec!(43342.83));
    }

    #[test]
    fn integrate_stops_exactly_at_bracket_edge() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(55867));

        assert_eq!(detail.breakdown.len(), 1);
        assert_eq!(detail.total, dec!(8380.05));
    }

    #[test]
    fn integrate_uses_unbounded_top_bracket() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(346752));

        assert_eq!(detail.breakdown.len(), 5);
        let top = detail.breakdown.last().unwrap();
        assert_eq!(top.amount(), dec!(100000));
        assert_eq!(top.tax(), dec!(33000));
    }

    #[test]
    fn integrate_breakdown_sums_to_income_and_total() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(123456.78));

        let amount_sum: Decimal = detail.breakdown.iter().map(LineItem::amount).sum();
        let tax_sum: Decimal = detail.breakdown.iter().map(LineItem::tax).sum();
        assert_eq!(amount_sum, dec!(123456.78));
        assert_eq!(tax_sum, detail.total);
    }

    #[test]
    fn integrate_contains_no_credit_lines() {
        let brackets = federal_brackets();

        let detail = BracketIntegrator::new(&brackets).integrate(dec!(80000));

        assert_eq!(detail.credit_lines().count(), 0);
        assert_eq!(detail.bracket_lines().count(), 2);
    }
}
