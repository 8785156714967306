//! Hour-by-hour digital twin of a household solar+battery+grid energy system.

pub mod config;
pub mod devices;
/// CSV telemetry export.
pub mod io;
/// Scenario wiring, run entry point, and strategy comparison.
pub mod runner;
pub mod sim;
