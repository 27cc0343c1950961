//! The tax computation engine.
//!
//! Data flows one way through four stages:
//!
//! 1. [`ContributionCalculator`]: pension contributions, insurance premium,
//!    taxable income.
//! 2. [`BracketIntegrator`]: progressive bracket tax on taxable income.
//! 3. [`CreditCalculator`]: non-refundable credits against bracket tax.
//! 4. [`TaxComparison`]: runs the stages for the personal and corporate
//!    scenarios and derives the advantage.

pub mod brackets;
pub mod common;
pub mod comparison;
pub mod contributions;
pub mod credits;

pub use brackets::BracketIntegrator;
pub use comparison::{ACTIVE_BUSINESS_INCOME, TaxComparison};
pub use contributions::ContributionCalculator;
pub use credits::{CreditCalculator, apply_credits};
