pub mod calculations;
pub mod models;

pub use calculations::TaxComparison;
pub use models::*;
