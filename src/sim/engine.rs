//! The tick loop: advances weather, devices, and dispatch in lockstep.

use crate::devices::{BatteryStore, EnergyError, GridInterface, HouseholdLoad, Inverter, SolarPanel};
use crate::sim::clock::Clock;
use crate::sim::types::{RunStats, SimConfig, SimulationRun, TickRecord};
use crate::sim::weather::WeatherGenerator;

/// Owns every simulated component and steps them through the run.
///
/// Each tick follows a fixed order: weather resample at day boundaries,
/// then the per-tick quota reset, then generation and demand sampling, then
/// inverter dispatch, then the tick record. The engine itself holds no
/// energy state; all of it lives in the devices.
pub struct Engine {
    config: SimConfig,
    weather: WeatherGenerator,
    panel: SolarPanel,
    household: HouseholdLoad,
    battery: BatteryStore,
    grid: GridInterface,
    inverter: Inverter,
}

impl Engine {
    /// Assembles an engine from already-constructed components.
    pub fn new(
        config: SimConfig,
        weather: WeatherGenerator,
        panel: SolarPanel,
        household: HouseholdLoad,
        battery: BatteryStore,
        grid: GridInterface,
        inverter: Inverter,
    ) -> Self {
        Self {
            config,
            weather,
            panel,
            household,
            battery,
            grid,
            inverter,
        }
    }

    /// Advances the simulation by one tick and returns its record.
    ///
    /// # Errors
    ///
    /// Propagates an [`EnergyError`] from dispatch, which indicates a
    /// bookkeeping bug rather than a runtime condition.
    fn tick(&mut self, t: usize, clock: &Clock) -> Result<TickRecord, EnergyError> {
        if clock.is_day_start(t) {
            self.weather.update(self.config.date_at(t));
        }
        // The quota reset runs every tick; it only takes effect on day 1.
        self.grid.reset(clock.day_index(t));

        let weather = self.weather.state();
        let generation_w = self
            .panel
            .generation_w(clock.hour_of_day(t), weather.cloud_cover);
        let load_w = self.household.demand_w();

        let operating =
            self.inverter
                .dispatch(generation_w, load_w, &mut self.battery, &mut self.grid)?;

        Ok(TickRecord {
            timestep: t,
            time_hr: clock.time_hr(t),
            day: clock.day_index(t),
            solar_wh: generation_w * self.config.dt_hours,
            load_wh: load_w * self.config.dt_hours,
            battery_soc_pct: self.battery.percentage(),
            grid_flow_wh: self.inverter.last_grid_flow_wh,
            cloud_cover: weather.cloud_cover,
            condition: weather.condition,
            inverter_operating: operating,
        })
    }

    /// Runs the full simulation and collects history plus aggregates.
    ///
    /// # Errors
    ///
    /// Propagates the first [`EnergyError`] raised by dispatch.
    pub fn run(mut self) -> Result<SimulationRun, EnergyError> {
        let mut clock = self.config.clock();
        let mut history = Vec::with_capacity(self.config.total_ticks());
        let mut stats = RunStats::default();

        while let Some(t) = clock.tick() {
            let record = self.tick(t, &clock)?;
            if record.battery_soc_pct >= 99.9 {
                stats.full_ticks += 1;
            }
            if record.battery_soc_pct <= 0.1 {
                stats.empty_ticks += 1;
            }
            history.push(record);
        }

        Ok(SimulationRun {
            history,
            metrics: self.inverter.metrics,
            fail_count: self.inverter.fail_count,
            total_downtime_h: self.inverter.total_downtime_h,
            stats,
        })
    }

    /// Simulation timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
