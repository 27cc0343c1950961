use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate band of a progressive schedule.
///
/// `max_income` is `None` for the top bracket, which extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Width of the bracket, or `None` when it is unbounded.
    pub fn span(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }
}
