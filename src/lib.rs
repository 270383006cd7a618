//! Water-distribution hierarchy KPI calculator.
//!
//! Classifies meters into main source, zone, direct-connection and
//! individual levels, sums their monthly consumption, and derives system
//! efficiency and staged loss figures.

#[cfg(feature = "api")]
pub mod api;
pub mod calculator;
pub mod config;
pub mod error;
/// Hierarchy KPIs, data-quality warnings and derived views.
pub mod hierarchy;
pub mod io;
pub mod meter;
pub mod source;

pub use calculator::{KpiCalculator, KpiRun};
pub use error::{KpiError, Result};
