//! Builds a full simulation from a [`ScenarioConfig`] and runs it.

use std::fmt;

use chrono::Datelike;

use crate::config::{ConfigError, ScenarioConfig};
use crate::devices::{BatteryStore, EnergyError, GridInterface, HouseholdLoad, Inverter, SolarPanel};
use crate::sim::engine::Engine;
use crate::sim::summary::SummaryReport;
use crate::sim::types::{DispatchStrategy, SimConfig, SimulationRun};
use crate::sim::weather::{Season, WeatherGenerator};

/// Error raised while assembling or running a scenario.
#[derive(Debug)]
pub enum RunError {
    /// The scenario configuration is invalid.
    Config(ConfigError),
    /// Dispatch bookkeeping violated a battery bound.
    Energy(EnergyError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::Energy(e) => write!(f, "simulation error: {e}"),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<EnergyError> for RunError {
    fn from(e: EnergyError) -> Self {
        RunError::Energy(e)
    }
}

/// Assembles an [`Engine`] from a scenario configuration.
///
/// Each stochastic component gets its own RNG stream derived from the
/// master seed, so adding a sampler never perturbs the others.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the start date or strategy cannot be parsed.
pub fn build_engine(config: &ScenarioConfig) -> Result<Engine, ConfigError> {
    let start_date = config.start_date()?;
    let strategy = config.strategy()?;
    let sim_config = SimConfig::new(
        config.simulation.days,
        config.simulation.minutes_per_tick,
        config.simulation.seed,
        start_date,
    );

    let weather = WeatherGenerator::new(
        &config.weather.season_weight_table(),
        &config.weather.cloud_range_table(),
        Season::from_month(start_date.month()),
        config.simulation.seed.wrapping_add(1),
    );

    let inverter = Inverter::new(
        strategy,
        config.inverter.clipping_w,
        config.battery.round_trip_efficiency,
        config.inverter.fail_probability,
        config.inverter.min_fail_duration_h,
        config.inverter.max_fail_duration_h,
        config.grid.export_limit,
        &sim_config,
        config.simulation.seed.wrapping_add(2),
    );

    Ok(Engine::new(
        sim_config,
        weather,
        SolarPanel::new(config.solar.peak_w, config.solar.cloud_attenuation),
        HouseholdLoad::new(config.household.base_load_w),
        BatteryStore::new(
            config.battery.capacity_wh,
            config.battery.initial_charge_wh,
            config.battery.floor,
        ),
        GridInterface::new(config.grid.export_limit),
        inverter,
    ))
}

/// Runs one scenario end to end.
///
/// # Errors
///
/// Returns a [`RunError`] if the configuration cannot be assembled or
/// dispatch bookkeeping fails mid-run.
pub fn run_scenario(
    config: &ScenarioConfig,
    print_readable_log: bool,
) -> Result<SimulationRun, RunError> {
    let engine = build_engine(config)?;
    let run = engine.run()?;

    if print_readable_log {
        for record in &run.history {
            println!("{record}");
        }
    }

    Ok(run)
}

/// One strategy's result in a comparison sweep.
pub struct StrategySummary {
    pub strategy: DispatchStrategy,
    pub report: SummaryReport,
}

/// Runs the same scenario under all three dispatch strategies.
///
/// Every run shares the scenario's seed, so the weather and failure draws
/// are identical across strategies and the comparison isolates dispatch.
///
/// # Errors
///
/// Returns a [`RunError`] if any of the runs fails.
pub fn compare_strategies(config: &ScenarioConfig) -> Result<Vec<StrategySummary>, RunError> {
    let dt_hours = config.simulation.minutes_per_tick as f32 / 60.0;
    let mut summaries = Vec::with_capacity(DispatchStrategy::ALL.len());

    for strategy in DispatchStrategy::ALL {
        let mut variant = config.clone();
        variant.simulation.strategy = strategy.name().to_string();
        let run = run_scenario(&variant, false)?;
        summaries.push(StrategySummary {
            strategy,
            report: SummaryReport::from_run(
                &run,
                dt_hours,
                config.economics.import_cost_per_kwh,
                config.economics.export_rate_per_kwh,
            ),
        });
    }

    Ok(summaries)
}
