//! Weekly report generation
//!
//! [`WeekSummary`] aggregates a week of activities; [`render_live`] and
//! [`render_permanent`] turn it into the markdown written by the sync engine.

pub mod format;
mod render;
mod summary;

pub use render::{activity_row, render_live, render_permanent};
pub use summary::WeekSummary;
