use serde::{Deserialize, Serialize};

use crate::{CreditRule, TaxBracket};

/// Brackets and credits for one taxing authority (federal or provincial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    pub name: String,
    pub brackets: Vec<TaxBracket>,
    /// Applied in order; the order is the order of the credit line items.
    #[serde(default)]
    pub credits: Vec<CreditRule>,
}

impl TaxSchedule {
    pub fn new(
        name: impl Into<String>,
        brackets: Vec<TaxBracket>,
        credits: Vec<CreditRule>,
    ) -> Self {
        Self {
            name: name.into(),
            brackets,
            credits,
        }
    }
}
