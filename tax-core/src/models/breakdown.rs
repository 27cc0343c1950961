use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of an itemized tax breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItem {
    /// Income taxed inside one bracket.
    Bracket {
        min_income: Decimal,
        max_income: Option<Decimal>,
        amount: Decimal,
        rate: Decimal,
        tax: Decimal,
    },

    /// Income taxed at a single named rate, such as active business income.
    Flat {
        label: String,
        amount: Decimal,
        rate: Decimal,
        tax: Decimal,
    },

    /// A credit offsetting tax. `tax` is negative.
    Credit {
        label: String,
        amount: Decimal,
        tax: Decimal,
    },
}

impl LineItem {
    pub fn tax(&self) -> Decimal {
        match self {
            Self::Bracket { tax, .. } | Self::Flat { tax, .. } | Self::Credit { tax, .. } => *tax,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Bracket { amount, .. }
            | Self::Flat { amount, .. }
            | Self::Credit { amount, .. } => *amount,
        }
    }

    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Credit { .. })
    }
}

/// Tax owed to one authority together with the lines that produced it.
///
/// Bracket lines come first in bracket order, then credit lines in rule
/// order. Each calculation stage returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetail {
    pub total: Decimal,
    pub breakdown: Vec<LineItem>,
}

impl BracketDetail {
    pub fn bracket_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.breakdown.iter().filter(|line| !line.is_credit())
    }

    pub fn credit_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.breakdown.iter().filter(|line| line.is_credit())
    }
}
