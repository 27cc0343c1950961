//! Command-line front end for the personal vs. corporate tax comparison.
//!
//! Text typed by the user is turned into an [`state::AppState`], the engine
//! from `tax-core` recomputes both scenarios, and [`report::Report`] renders
//! the result as text or JSON.

pub mod app;
pub mod format;
pub mod input;
pub mod logging;
pub mod report;
pub mod scenarios;
pub mod session;
pub mod state;
