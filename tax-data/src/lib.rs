//! Loading jurisdiction data from files.
//!
//! A whole [`tax_core::JurisdictionConfig`] can be read from TOML with
//! [`JurisdictionLoader`]; the federal and provincial bracket tables alone can
//! be replaced from CSV with [`BracketScheduleLoader`]. Both validate the
//! resulting configuration before handing it back.

mod jurisdiction;
mod loader;

pub use jurisdiction::{JurisdictionLoadError, JurisdictionLoader};
pub use loader::{BracketLoadError, BracketRecord, BracketScheduleLoader, ScheduleKind};
