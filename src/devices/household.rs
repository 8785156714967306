/// Household demand, recomputed each tick from a constant baseline.
///
/// Kept as a struct rather than a constant so variable load profiles can be
/// slotted in without touching the engine.
#[derive(Debug, Clone)]
pub struct HouseholdLoad {
    /// Baseline consumption in watts.
    pub base_load_w: f32,
}

impl HouseholdLoad {
    /// Creates a household with the given baseline load in watts.
    ///
    /// # Panics
    ///
    /// Panics if `base_load_w` is negative.
    pub fn new(base_load_w: f32) -> Self {
        assert!(base_load_w >= 0.0);
        Self { base_load_w }
    }

    /// Demand in watts for the current tick.
    pub fn demand_w(&self) -> f32 {
        self.base_load_w
    }
}
