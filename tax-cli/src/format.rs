//! Display formatting for amounts, rates and bracket ranges.
//!
//! Currency follows the en-CA convention used on Canadian returns: a leading
//! `$`, comma thousands separators and no fraction digits.

use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;

/// Formats an amount as whole dollars, e.g. `$200,000` or `-$2,356`.
///
/// Half-cent and half-dollar amounts round away from zero. Amounts that round
/// to zero are shown without a sign.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount, 0);
    let digits = group_thousands(&rounded.abs().to_string());

    if rounded < Decimal::ZERO {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Formats a fractional rate as a percentage with at most one decimal.
///
/// `0.15` becomes `15%`, `0.205` becomes `20.5%` and `0.1275` becomes `12.8%`.
pub fn format_percent(rate: Decimal) -> String {
    let percent = round_half_up(rate * Decimal::ONE_HUNDRED, 1).to_string();
    let trimmed = percent.strip_suffix(".0").unwrap_or(&percent);
    format!("{trimmed}%")
}

/// Formats an effective rate that is already a percentage, e.g. `36.30%`.
pub fn format_effective_rate(rate: Decimal) -> String {
    format!("{}%", round_half_up(rate, 2))
}

/// Formats a share of income to one decimal place without the `%` sign.
pub fn format_share(share: Decimal) -> String {
    round_half_up(share, 1).to_string()
}

/// Label for a bracket: `$55,867 - $111,733`, or `$246,752+` when unbounded.
pub fn bracket_range_label(
    min_income: Decimal,
    max_income: Option<Decimal>,
) -> String {
    let lower = format_currency(min_income);
    match max_income {
        Some(max) => format!("{lower} - {}", format_currency(max)),
        None => format!("{lower}+"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
