//! Free-text amount parsing.
//!
//! Amounts may be typed with a dollar sign, separators or spaces (`$200,000`,
//! `200 000`). Every non-digit character is discarded, so the parser never
//! fails: text without digits is zero.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::format::format_currency;

/// Personal-expense draw assumed when the field is left blank.
pub const DEFAULT_EXPENSES: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("non-digit pattern is valid"));

/// Removes every character that is not an ASCII digit.
pub fn digits_only(text: &str) -> String {
    NON_DIGIT.replace_all(text, "").into_owned()
}

/// Parses an amount by keeping only its digits.
///
/// Empty or digit-free text is zero. A decimal point is discarded like any
/// other separator, so `"1,234.56"` reads as `123456`. Values too large for a
/// [`Decimal`] degrade to zero with a warning.
pub fn parse_currency_input(text: &str) -> Decimal {
    let digits = digits_only(text);
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    digits.parse().unwrap_or_else(|e| {
        warn!(input = %text, "amount out of range, using 0: {}", e);
        Decimal::ZERO
    })
}

/// Parses the personal-expense draw: blank text means [`DEFAULT_EXPENSES`].
pub fn parse_expenses_input(text: &str) -> Decimal {
    if text.trim().is_empty() {
        DEFAULT_EXPENSES
    } else {
        parse_currency_input(text)
    }
}

/// Reformats typed text as grouped currency, or an empty string when it holds
/// no digits.
pub fn format_input_currency(text: &str) -> String {
    if digits_only(text).is_empty() {
        return String::new();
    }
    format_currency(parse_currency_input(text))
}

/// Reads a toggle value such as `on`, `off`, `yes`, `no`, `true` or `false`.
pub fn parse_toggle(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "y" | "true" | "1" => Some(true),
        "off" | "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
