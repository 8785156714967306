/// Grid connection that tracks cumulative export against a fixed quota.
///
/// Export consumes the quota; once `quota_consumed` reaches `export_quota`
/// no further export is accepted. Import is unconstrained and therefore not
/// modeled here beyond the sign convention in the dispatch engine.
#[derive(Debug, Clone)]
pub struct GridInterface {
    export_quota_wh: f32,
    quota_consumed_wh: f32,
}

impl GridInterface {
    /// Creates a grid interface with the given export quota in Wh.
    ///
    /// # Panics
    ///
    /// Panics if `export_quota_wh` is negative.
    pub fn new(export_quota_wh: f32) -> Self {
        assert!(export_quota_wh >= 0.0);
        Self {
            export_quota_wh,
            quota_consumed_wh: 0.0,
        }
    }

    /// Records an export of `amount_wh`, capped so consumption never
    /// exceeds the quota.
    pub fn export(&mut self, amount_wh: f32) {
        self.quota_consumed_wh = (self.quota_consumed_wh + amount_wh).min(self.export_quota_wh);
    }

    /// Export quota still available, in Wh.
    pub fn remaining_export(&self) -> f32 {
        self.export_quota_wh - self.quota_consumed_wh
    }

    /// Cumulative export recorded against the quota, in Wh.
    pub fn quota_consumed(&self) -> f32 {
        self.quota_consumed_wh
    }

    /// Clears the consumed quota if and only if `day_index == 1`.
    ///
    /// Invoked once per tick by the engine with the current day index, so
    /// every tick of day 1 starts from a cleared quota. Outside day 1 the
    /// quota is consumed cumulatively across the whole run.
    pub fn reset(&mut self, day_index: usize) {
        if day_index == 1 {
            self.quota_consumed_wh = 0.0;
        }
    }
}
