//! Inverter dispatch engine: failure state machine plus the three-way
//! allocation policy routing energy among home, battery, and grid.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::devices::battery::{BatteryStore, EnergyError};
use crate::devices::grid::GridInterface;
use crate::sim::types::{DispatchStrategy, SimConfig};

/// Threshold below which energy residues are treated as zero (Wh).
///
/// Guards every dispatch comparison against floating-point residue left by
/// the efficiency divisions.
pub const EPS_WH: f32 = 1e-3;

/// Threshold below which a downtime remainder counts as elapsed (hours).
///
/// Sub-hourly tick durations such as 20 minutes are not exact in binary,
/// so the countdown can land a hair above zero instead of on it.
const EPS_H: f32 = 1e-3;

/// Inverter availability, modeled as an explicit tagged state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InverterStatus {
    Operating,
    Failed {
        /// Hours of downtime left before recovery.
        downtime_remaining_h: f32,
    },
}

/// Energy accumulators maintained by the dispatch engine across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DispatchMetrics {
    /// Total post-clipping solar generation (Wh).
    pub total_solar_gen_wh: f32,
    /// Total energy delivered to the household (Wh).
    pub total_load_served_wh: f32,
    /// Total energy exported to the grid (Wh).
    pub total_grid_export_wh: f32,
    /// Total energy imported from the grid (Wh).
    pub total_grid_import_wh: f32,
    /// Total curtailed surplus that could not be stored or exported (Wh).
    pub total_losses_wh: f32,
    /// Ticks where the household load was covered by unplanned grid import.
    pub unmet_load_ticks: u32,
}

/// The per-tick energy allocator.
///
/// While operating, routes clipped solar generation among household load,
/// battery (with round-trip efficiency loss), and the grid according to the
/// configured [`DispatchStrategy`]. A stochastic failure sampler can take the
/// inverter down for a sampled number of hours, during which the household
/// is served entirely by grid import.
///
/// All amounts are pre-clamped to battery availability/headroom before a
/// transfer is applied, so an [`EnergyError`] surfacing from `dispatch`
/// indicates an engine bug (see DESIGN.md).
pub struct Inverter {
    strategy: DispatchStrategy,
    clipping_w: f32,
    /// Round-trip efficiency; store and draw each apply it once.
    efficiency: f32,
    fail_probability: f32,
    min_fail_duration_h: u32,
    max_fail_duration_h: u32,
    /// Fixed export ceiling used by the PRODUCE strategy (W).
    export_ceiling_w: f32,
    dt_hours: f32,
    status: InverterStatus,
    /// Number of OPERATING → FAILED transitions.
    pub fail_count: u32,
    /// Cumulative downtime in hours.
    pub total_downtime_h: f32,
    /// Net grid flow of the most recent tick (Wh; positive=export).
    pub last_grid_flow_wh: f32,
    /// Run-wide energy accumulators.
    pub metrics: DispatchMetrics,
    rng: StdRng,
}

impl Inverter {
    /// Creates a new inverter.
    ///
    /// # Arguments
    ///
    /// * `strategy` - Active dispatch strategy
    /// * `clipping_w` - Maximum generation the inverter passes through (W)
    /// * `efficiency` - Battery round-trip efficiency (0..=1.0)
    /// * `fail_probability` - Per-tick failure probability while operating
    /// * `min_fail_duration_h` - Minimum sampled downtime (hours)
    /// * `max_fail_duration_h` - Maximum sampled downtime (hours)
    /// * `export_ceiling_w` - Fixed export ceiling for PRODUCE (W)
    /// * `config` - Simulation configuration for tick duration
    /// * `seed` - Random seed for the failure sampler
    ///
    /// # Panics
    ///
    /// Panics if any parameter is outside its documented range or
    /// `min_fail_duration_h > max_fail_duration_h`.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        strategy: DispatchStrategy,
        clipping_w: f32,
        efficiency: f32,
        fail_probability: f32,
        min_fail_duration_h: u32,
        max_fail_duration_h: u32,
        export_ceiling_w: f32,
        config: &SimConfig,
        seed: u64,
    ) -> Self {
        assert!(clipping_w >= 0.0);
        assert!(efficiency > 0.0 && efficiency <= 1.0);
        assert!((0.0..=1.0).contains(&fail_probability));
        assert!(min_fail_duration_h <= max_fail_duration_h);
        assert!(export_ceiling_w >= 0.0);

        Self {
            strategy,
            clipping_w,
            efficiency,
            fail_probability,
            min_fail_duration_h,
            max_fail_duration_h,
            export_ceiling_w,
            dt_hours: config.dt_hours,
            status: InverterStatus::Operating,
            fail_count: 0,
            total_downtime_h: 0.0,
            last_grid_flow_wh: 0.0,
            metrics: DispatchMetrics::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current availability state.
    pub fn status(&self) -> InverterStatus {
        self.status
    }

    /// Allocates one tick of energy.
    ///
    /// Samples the failure transition, then either serves the failed-tick
    /// contract (grid covers the whole load, downtime counts down) or runs
    /// the configured dispatch strategy over the clipped generation.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the tick was served in the operating state,
    /// `Ok(false)` for a failed tick.
    ///
    /// # Errors
    ///
    /// Returns an [`EnergyError`] only if a battery transfer violates its
    /// pre-clamped bounds, which indicates an engine bug.
    pub fn dispatch(
        &mut self,
        generation_w: f32,
        load_w: f32,
        battery: &mut BatteryStore,
        grid: &mut GridInterface,
    ) -> Result<bool, EnergyError> {
        if self.status == InverterStatus::Operating
            && self.fail_probability > 0.0
            && self.rng.random::<f32>() < self.fail_probability
        {
            let downtime =
                self.rng.random_range(self.min_fail_duration_h..=self.max_fail_duration_h);
            self.status = InverterStatus::Failed {
                downtime_remaining_h: downtime as f32,
            };
            self.fail_count += 1;
        }

        if let InverterStatus::Failed {
            downtime_remaining_h,
        } = self.status
        {
            self.failed_tick(load_w, downtime_remaining_h);
            return Ok(false);
        }

        self.operating_tick(generation_w, load_w, battery, grid)?;
        Ok(true)
    }

    /// Failed-tick contract: the grid carries the whole household load and
    /// the downtime counter advances. No battery or panel interaction.
    fn failed_tick(&mut self, load_w: f32, downtime_remaining_h: f32) {
        let load_wh = load_w * self.dt_hours;
        self.metrics.total_grid_import_wh += load_wh;
        self.metrics.unmet_load_ticks += 1;
        self.last_grid_flow_wh = -load_wh;

        self.total_downtime_h += self.dt_hours;
        let remaining = downtime_remaining_h - self.dt_hours;
        self.status = if remaining <= EPS_H {
            InverterStatus::Operating
        } else {
            InverterStatus::Failed {
                downtime_remaining_h: remaining,
            }
        };
    }

    fn operating_tick(
        &mut self,
        generation_w: f32,
        load_w: f32,
        battery: &mut BatteryStore,
        grid: &mut GridInterface,
    ) -> Result<(), EnergyError> {
        let real_generation_w = generation_w.min(self.clipping_w);
        let mut gen_wh = real_generation_w * self.dt_hours;
        let mut load_wh = load_w * self.dt_hours;
        self.metrics.total_solar_gen_wh += gen_wh;

        let mut served_wh = 0.0_f32;
        let mut export_wh = 0.0_f32;
        let mut import_wh = 0.0_f32;
        let mut loss_wh = 0.0_f32;

        match self.strategy {
            DispatchStrategy::Load => {
                // Home first: direct solar, then battery, then grid import.
                let solar_to_home = load_wh.min(gen_wh);
                served_wh += solar_to_home;
                gen_wh -= solar_to_home;
                load_wh -= solar_to_home;

                if load_wh > EPS_WH {
                    // Discharging incurs the loss: draw the needed amount
                    // divided by efficiency, capped at what is usable.
                    let needed_raw = load_wh / self.efficiency;
                    let draw = needed_raw.min(battery.available_energy());
                    if draw > EPS_WH {
                        battery.get(draw)?;
                        let usable = draw * self.efficiency;
                        served_wh += usable;
                        load_wh = (load_wh - usable).max(0.0);
                    }
                }

                if load_wh > EPS_WH {
                    import_wh = load_wh;
                    served_wh += load_wh;
                    load_wh = 0.0;
                }

                if gen_wh > EPS_WH {
                    let stored = (gen_wh * self.efficiency).min(battery.remaining_capacity());
                    if stored > EPS_WH {
                        battery.put(stored)?;
                        gen_wh = (gen_wh - stored / self.efficiency).max(0.0);
                    }
                }

                if gen_wh > EPS_WH {
                    export_wh = gen_wh.min(grid.remaining_export());
                    grid.export(export_wh);
                    loss_wh = gen_wh - export_wh;
                }
            }
            DispatchStrategy::Charge => {
                // Battery strictly first; the battery is never discharged
                // to cover load under this policy.
                if gen_wh > EPS_WH {
                    let stored = (gen_wh * self.efficiency).min(battery.remaining_capacity());
                    if stored > EPS_WH {
                        battery.put(stored)?;
                        gen_wh = (gen_wh - stored / self.efficiency).max(0.0);
                    }
                }

                let solar_to_home = load_wh.min(gen_wh);
                served_wh += solar_to_home;
                gen_wh -= solar_to_home;
                load_wh -= solar_to_home;

                if load_wh > EPS_WH {
                    import_wh = load_wh;
                    served_wh += load_wh;
                }

                if gen_wh > EPS_WH {
                    loss_wh = gen_wh;
                }
            }
            DispatchStrategy::Produce => {
                // Export up to the fixed ceiling, not the remaining quota.
                let solar_to_home = load_wh.min(gen_wh);
                served_wh += solar_to_home;
                gen_wh -= solar_to_home;
                load_wh -= solar_to_home;

                if gen_wh > EPS_WH {
                    let ceiling_wh = self.export_ceiling_w * self.dt_hours;
                    export_wh = gen_wh.min(ceiling_wh);
                    grid.export(export_wh);
                    gen_wh -= export_wh;
                }

                if gen_wh > EPS_WH {
                    let stored = (gen_wh * self.efficiency).min(battery.remaining_capacity());
                    if stored > EPS_WH {
                        battery.put(stored)?;
                        gen_wh = (gen_wh - stored / self.efficiency).max(0.0);
                    }
                }

                if gen_wh > EPS_WH {
                    loss_wh = gen_wh;
                }

                if load_wh > EPS_WH {
                    import_wh = load_wh;
                    served_wh += load_wh;
                }
            }
        }

        self.metrics.total_load_served_wh += served_wh;
        self.metrics.total_losses_wh += loss_wh;

        // Net flow per tick is export-exclusive-or-import by construction;
        // accumulating by sign keeps the books consistent regardless.
        let net_flow_wh = export_wh - import_wh;
        if net_flow_wh > 0.0 {
            self.metrics.total_grid_export_wh += net_flow_wh;
        } else {
            self.metrics.total_grid_import_wh += -net_flow_wh;
        }
        self.last_grid_flow_wh = net_flow_wh;

        Ok(())
    }
}
