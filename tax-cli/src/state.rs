//! Input state for one comparison.
//!
//! Every field change goes through this type so the one-shot mode, the
//! interactive session and batch rows all turn text into the same values.

use rust_decimal::Decimal;
use tax_core::{ComparisonOptions, EmploymentStatus};

use crate::input::{DEFAULT_EXPENSES, parse_currency_input, parse_expenses_input};

/// The values the comparison is recomputed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    /// Gross practice income before any tax.
    pub gross_income: Decimal,
    /// Personal-expense draw taken as salary in the corporate scenario.
    pub expenses: Decimal,
    /// Whether employment-insurance premiums are charged on personal income.
    pub include_insurance: bool,
    pub employment_status: EmploymentStatus,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            gross_income: Decimal::ZERO,
            expenses: DEFAULT_EXPENSES,
            include_insurance: false,
            employment_status: EmploymentStatus::Employee,
        }
    }
}

impl AppState {
    /// Builds a state from typed text; blank expenses use the default draw.
    pub fn from_text(
        income: &str,
        expenses: &str,
        include_insurance: bool,
        self_employed: bool,
    ) -> Self {
        Self {
            gross_income: parse_currency_input(income),
            expenses: parse_expenses_input(expenses),
            include_insurance,
            employment_status: EmploymentStatus::from_self_employed(self_employed),
        }
    }

    pub fn set_income(
        &mut self,
        text: &str,
    ) {
        self.gross_income = parse_currency_input(text);
    }

    pub fn set_expenses(
        &mut self,
        text: &str,
    ) {
        self.expenses = parse_expenses_input(text);
    }

    pub fn set_self_employed(
        &mut self,
        self_employed: bool,
    ) {
        self.employment_status = EmploymentStatus::from_self_employed(self_employed);
    }

    pub fn is_self_employed(&self) -> bool {
        self.employment_status.is_self_employed()
    }

    pub fn options(&self) -> ComparisonOptions {
        ComparisonOptions {
            include_insurance: self.include_insurance,
            employment_status: self.employment_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_state_has_no_income_and_default_draw() {
        let state = AppState::default();

        assert_eq!(state.gross_income, Decimal::ZERO);
        assert_eq!(state.expenses, dec!(100000));
        assert!(!state.include_insurance);
        assert!(!state.is_self_employed());
    }

    #[test]
    fn from_text_parses_both_amounts() {
        let state = AppState::from_text("$200,000", "", true, false);

        assert_eq!(state.gross_income, dec!(200000));
        assert_eq!(state.expenses, dec!(100000));
        assert_eq!(
            state.options(),
            ComparisonOptions {
                include_insurance: true,
                employment_status: EmploymentStatus::Employee,
            }
        );
    }

    #[test]
    fn setters_reparse_text() {
        let mut state = AppState::default();

        state.set_income("150 000");
        state.set_expenses("60,000");
        state.set_self_employed(true);

        assert_eq!(state.gross_income, dec!(150000));
        assert_eq!(state.expenses, dec!(60000));
        assert_eq!(state.options().employment_status, EmploymentStatus::SelfEmployed);
    }

    #[test]
    fn clearing_expenses_restores_default() {
        let mut state = AppState::from_text("90000", "40000", false, false);

        state.set_expenses("");

        assert_eq!(state.expenses, dec!(100000));
    }
}
