//! Simulation clock, weather, engine, and reporting modules.

/// Simulation clock for tick management.
pub mod clock;
pub mod engine;
pub mod summary;
pub mod types;
/// Stochastic daily weather model.
pub mod weather;
