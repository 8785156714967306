//! End-of-run summary: energy totals, battery statistics, reliability, and
//! a simple import-cost/export-revenue balance.

use std::fmt;

use crate::sim::types::SimulationRun;

const WH_PER_KWH: f32 = 1000.0;

/// Aggregate report computed from a finished [`SimulationRun`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    /// Number of simulated ticks.
    pub ticks: usize,
    /// Mean battery state of charge across the run (percent).
    pub avg_soc_pct: f32,
    /// Ticks with the battery at or above 99.9% state of charge.
    pub full_ticks: u32,
    /// Ticks with the battery at or below 0.1% state of charge.
    pub empty_ticks: u32,
    /// Total post-clipping solar generation (kWh).
    pub solar_gen_kwh: f32,
    /// Total energy delivered to the household (kWh).
    pub load_served_kwh: f32,
    /// Total grid import (kWh).
    pub grid_import_kwh: f32,
    /// Total grid export (kWh).
    pub grid_export_kwh: f32,
    /// Total curtailed surplus (kWh).
    pub curtailment_kwh: f32,
    /// Ticks served by unplanned grid import during inverter downtime.
    pub unmet_load_ticks: u32,
    /// Number of inverter failure episodes.
    pub fail_count: u32,
    /// Cumulative inverter downtime (hours).
    pub total_downtime_h: f32,
    /// Mean downtime per failure episode (hours; 0 when no failures).
    pub avg_failure_duration_h: f32,
    /// Mean daily cloud coverage across the run.
    pub avg_cloud_cover: f32,
    /// Highest single-tick household demand (W).
    pub peak_load_w: f32,
    /// Export revenue minus import cost, in currency units.
    pub net_balance: f32,
}

impl SummaryReport {
    /// Computes the report from a finished run.
    ///
    /// # Arguments
    ///
    /// * `run` - Finished simulation run
    /// * `dt_hours` - Tick duration in hours, for Wh-to-W conversions
    /// * `import_cost_per_kwh` - Price paid per imported kWh
    /// * `export_rate_per_kwh` - Revenue earned per exported kWh
    pub fn from_run(
        run: &SimulationRun,
        dt_hours: f32,
        import_cost_per_kwh: f32,
        export_rate_per_kwh: f32,
    ) -> Self {
        let ticks = run.history.len();
        let n = ticks.max(1) as f32;

        let avg_soc_pct = run.history.iter().map(|r| r.battery_soc_pct).sum::<f32>() / n;
        let avg_cloud_cover = run.history.iter().map(|r| r.cloud_cover).sum::<f32>() / n;
        let peak_load_w = run
            .history
            .iter()
            .map(|r| r.load_wh / dt_hours)
            .fold(0.0_f32, f32::max);

        let grid_import_kwh = run.metrics.total_grid_import_wh / WH_PER_KWH;
        let grid_export_kwh = run.metrics.total_grid_export_wh / WH_PER_KWH;
        let avg_failure_duration_h = if run.fail_count > 0 {
            run.total_downtime_h / run.fail_count as f32
        } else {
            0.0
        };

        Self {
            ticks,
            avg_soc_pct,
            full_ticks: run.stats.full_ticks,
            empty_ticks: run.stats.empty_ticks,
            solar_gen_kwh: run.metrics.total_solar_gen_wh / WH_PER_KWH,
            load_served_kwh: run.metrics.total_load_served_wh / WH_PER_KWH,
            grid_import_kwh,
            grid_export_kwh,
            curtailment_kwh: run.metrics.total_losses_wh / WH_PER_KWH,
            unmet_load_ticks: run.metrics.unmet_load_ticks,
            fail_count: run.fail_count,
            total_downtime_h: run.total_downtime_h,
            avg_failure_duration_h,
            avg_cloud_cover,
            peak_load_w,
            net_balance: grid_export_kwh * export_rate_per_kwh
                - grid_import_kwh * import_cost_per_kwh,
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Ticks simulated:        {}", self.ticks)?;
        writeln!(f)?;
        writeln!(f, "-- Energy --")?;
        writeln!(f, "Solar generation:       {:>10.2} kWh", self.solar_gen_kwh)?;
        writeln!(f, "Load served:            {:>10.2} kWh", self.load_served_kwh)?;
        writeln!(f, "Grid import:            {:>10.2} kWh", self.grid_import_kwh)?;
        writeln!(f, "Grid export:            {:>10.2} kWh", self.grid_export_kwh)?;
        writeln!(f, "Curtailed surplus:      {:>10.2} kWh", self.curtailment_kwh)?;
        writeln!(f, "Peak household load:    {:>10.1} W", self.peak_load_w)?;
        writeln!(f)?;
        writeln!(f, "-- Battery --")?;
        writeln!(f, "Average SoC:            {:>10.1} %", self.avg_soc_pct)?;
        writeln!(f, "Ticks full:             {:>10}", self.full_ticks)?;
        writeln!(f, "Ticks empty:            {:>10}", self.empty_ticks)?;
        writeln!(f)?;
        writeln!(f, "-- Reliability --")?;
        writeln!(f, "Inverter failures:      {:>10}", self.fail_count)?;
        writeln!(f, "Total downtime:         {:>10.1} h", self.total_downtime_h)?;
        writeln!(
            f,
            "Avg failure duration:   {:>10.1} h",
            self.avg_failure_duration_h
        )?;
        writeln!(f, "Unmet-load ticks:       {:>10}", self.unmet_load_ticks)?;
        writeln!(f)?;
        writeln!(f, "-- Weather --")?;
        writeln!(f, "Average cloud cover:    {:>10.2}", self.avg_cloud_cover)?;
        writeln!(f)?;
        writeln!(f, "-- Economics --")?;
        write!(f, "Net balance:            {:>10.2}", self.net_balance)
    }
}
