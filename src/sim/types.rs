//! Core simulation types: configuration, dispatch strategy, and tick records.

use std::fmt;

use chrono::{Days, NaiveDate};

use crate::devices::inverter::DispatchMetrics;
use crate::sim::clock::Clock;
use crate::sim::weather::SkyCondition;

/// Centralized simulation timing configuration.
///
/// Holds the horizon, tick duration, and calendar anchor; time-of-day
/// derivations live on the [`Clock`] it constructs.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use greengrid_sim::sim::types::SimConfig;
///
/// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
/// let cfg = SimConfig::new(30, 60, 42, start);
/// assert_eq!(cfg.dt_hours, 1.0);
/// assert_eq!(cfg.total_ticks(), 720);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of days to simulate.
    pub days: usize,
    /// Minutes per simulation tick (must evenly divide a day).
    pub minutes_per_tick: u32,
    /// Duration of one tick in hours, derived as `minutes_per_tick / 60`.
    pub dt_hours: f32,
    /// Number of ticks per simulated day.
    pub ticks_per_day: usize,
    /// Master random seed for reproducibility.
    pub seed: u64,
    /// Calendar date of the first simulated day.
    pub start_date: NaiveDate,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Arguments
    ///
    /// * `days` - Number of days to simulate (must be > 0)
    /// * `minutes_per_tick` - Tick duration in minutes (must divide 1440)
    /// * `seed` - Master random seed
    /// * `start_date` - Calendar date of the first simulated day
    ///
    /// # Panics
    ///
    /// Panics if `days` is zero or `minutes_per_tick` does not evenly
    /// divide a 24-hour day.
    pub fn new(days: usize, minutes_per_tick: u32, seed: u64, start_date: NaiveDate) -> Self {
        assert!(days > 0, "days must be > 0");
        assert!(
            minutes_per_tick > 0 && 1440 % minutes_per_tick == 0,
            "minutes_per_tick must evenly divide a day"
        );
        Self {
            days,
            minutes_per_tick,
            dt_hours: minutes_per_tick as f32 / 60.0,
            ticks_per_day: (1440 / minutes_per_tick) as usize,
            seed,
            start_date,
        }
    }

    /// Total number of simulation ticks across all days.
    pub fn total_ticks(&self) -> usize {
        self.ticks_per_day * self.days
    }

    /// Builds the clock spanning this configuration's horizon.
    pub fn clock(&self) -> Clock {
        Clock::new(self.total_ticks(), self.ticks_per_day, self.dt_hours)
    }

    /// Calendar date at tick `t`.
    pub fn date_at(&self, t: usize) -> NaiveDate {
        self.start_date + Days::new((t / self.ticks_per_day) as u64)
    }
}

/// Ordering among home, battery, and grid applied when allocating generation.
///
/// The three policies share the same inputs and bookkeeping and differ only
/// in the order the three sinks are offered energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// Serve household load first, then battery, then grid export.
    Load,
    /// Charge the battery first, then serve load; never discharge to load.
    Charge,
    /// Export first (fixed ceiling), then battery; never discharge to load.
    Produce,
}

impl DispatchStrategy {
    /// All strategies, in comparison-table order.
    pub const ALL: [DispatchStrategy; 3] = [
        DispatchStrategy::Load,
        DispatchStrategy::Charge,
        DispatchStrategy::Produce,
    ];

    /// Parses a strategy from its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "load" => Some(DispatchStrategy::Load),
            "charge" => Some(DispatchStrategy::Charge),
            "produce" => Some(DispatchStrategy::Produce),
            _ => None,
        }
    }

    /// Configuration name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            DispatchStrategy::Load => "load",
            DispatchStrategy::Charge => "charge",
            DispatchStrategy::Produce => "produce",
        }
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStrategy::Load => write!(f, "LOAD priority"),
            DispatchStrategy::Charge => write!(f, "CHARGE priority"),
            DispatchStrategy::Produce => write!(f, "PRODUCE priority"),
        }
    }
}

/// Complete record of one simulation tick.
#[derive(Debug, Clone)]
pub struct TickRecord {
    /// Tick index.
    pub timestep: usize,
    /// Simulation time in hours.
    pub time_hr: f32,
    /// Day index (0-based).
    pub day: usize,
    /// Panel generation this tick (Wh, pre-clipping).
    pub solar_wh: f32,
    /// Household demand this tick (Wh).
    pub load_wh: f32,
    /// Battery state of charge after this tick (percent).
    pub battery_soc_pct: f32,
    /// Net grid flow this tick (Wh; positive=export, negative=import).
    pub grid_flow_wh: f32,
    /// Cloud coverage for the day (0.0 to 1.0).
    pub cloud_cover: f32,
    /// Sky condition for the day.
    pub condition: SkyCondition,
    /// Whether the inverter served this tick in the operating state.
    pub inverter_operating: bool,
}

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} (day {:>2}, {:>4.1}h) | solar={:>7.1} Wh  load={:>6.1} Wh  \
             SoC={:>5.1}%  grid={:>8.1} Wh | {} cloud={:.2} | inverter {}",
            self.timestep,
            self.day,
            self.time_hr % 24.0,
            self.solar_wh,
            self.load_wh,
            self.battery_soc_pct,
            self.grid_flow_wh,
            self.condition,
            self.cloud_cover,
            if self.inverter_operating { "OK" } else { "DOWN" },
        )
    }
}

/// Battery-extreme tick counters accumulated during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    /// Ticks where the battery was at or above 99.9% state of charge.
    pub full_ticks: u32,
    /// Ticks where the battery was at or below 0.1% state of charge.
    pub empty_ticks: u32,
}

/// Finished simulation run: per-tick history plus aggregate accumulators.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// One record per tick, in order.
    pub history: Vec<TickRecord>,
    /// Inverter energy accumulators.
    pub metrics: DispatchMetrics,
    /// Number of OPERATING → FAILED transitions.
    pub fail_count: u32,
    /// Cumulative inverter downtime in hours.
    pub total_downtime_h: f32,
    /// Battery-extreme tick counters.
    pub stats: RunStats,
}
