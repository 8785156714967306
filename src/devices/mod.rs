//! Physical components of the household energy system.

/// Capacity-bounded battery energy store.
pub mod battery;
/// Grid connection with a cumulative export quota.
pub mod grid;
/// Constant-baseline household demand.
pub mod household;
/// Inverter dispatch engine and failure state machine.
pub mod inverter;
/// Sinusoidal day/night solar generation model.
pub mod solar;

// Re-export the main types for convenience
pub use battery::{BatteryStore, EnergyError};
pub use grid::GridInterface;
pub use household::HouseholdLoad;
pub use inverter::{DispatchMetrics, Inverter, InverterStatus};
pub use solar::SolarPanel;
