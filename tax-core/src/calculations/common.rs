//! Small numeric helpers shared by the calculators.
//!
//! The calculators carry full precision; the only value rounded inside the
//! engine is the effective rate, which is reported to two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to `dp` decimal places, halves away from zero, and fixes the
/// scale so that `0` displays as `0.00` when `dp` is 2.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(36.295), 2), dec!(36.30));
/// assert_eq!(round_half_up(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_half_up(dec!(0), 2).to_string(), "0.00");
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-338)), dec!(0));
/// assert_eq!(non_negative(dec!(1200.50)), dec!(1200.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `part / whole * 100`, unrounded. Zero when `whole` is not positive.
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

/// Total tax as a percentage of gross income, to two decimal places.
///
/// Returns `0.00` rather than dividing by zero when there is no income.
pub fn effective_rate(
    total_tax: Decimal,
    gross_income: Decimal,
) -> Decimal {
    round_half_up(percentage_of(total_tax, gross_income), 2)
}
