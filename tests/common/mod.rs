//! Shared test fixtures for integration tests.

use greengrid_sim::config::ScenarioConfig;
use greengrid_sim::sim::types::TickRecord;

/// Short baseline scenario (5 days, hourly ticks, seed 42).
pub fn baseline_scenario() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.days = 5;
    cfg
}

/// Baseline scenario with inverter failures disabled.
pub fn no_failure_scenario() -> ScenarioConfig {
    let mut cfg = baseline_scenario();
    cfg.inverter.fail_probability = 0.0;
    cfg
}

/// Sum of exported energy across the history (positive grid flows), in Wh.
pub fn total_export_wh(history: &[TickRecord]) -> f32 {
    history.iter().map(|r| r.grid_flow_wh.max(0.0)).sum()
}

/// Sum of imported energy across the history (negative grid flows), in Wh.
pub fn total_import_wh(history: &[TickRecord]) -> f32 {
    history.iter().map(|r| (-r.grid_flow_wh).max(0.0)).sum()
}
