use std::error::Error;
use std::fmt;

/// Contract violation on a battery energy transfer.
///
/// The dispatch engine pre-clamps every transfer to the available
/// level/headroom, so these errors indicate an engine bug rather than an
/// expected runtime condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyError {
    /// Attempted draw exceeds the stored energy.
    InsufficientEnergy { requested_wh: f32, level_wh: f32 },
    /// Attempted store exceeds the remaining headroom.
    CapacityExceeded { requested_wh: f32, headroom_wh: f32 },
}

impl fmt::Display for EnergyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyError::InsufficientEnergy {
                requested_wh,
                level_wh,
            } => write!(
                f,
                "insufficient energy: requested {requested_wh:.3} Wh with {level_wh:.3} Wh stored"
            ),
            EnergyError::CapacityExceeded {
                requested_wh,
                headroom_wh,
            } => write!(
                f,
                "capacity exceeded: requested {requested_wh:.3} Wh with {headroom_wh:.3} Wh headroom"
            ),
        }
    }
}

impl Error for EnergyError {}

/// A capacity-bounded battery energy reservoir.
///
/// The level is always within `[0, capacity]`; callers pre-clamp transfer
/// amounts to [`BatteryStore::available_energy`] / [`BatteryStore::remaining_capacity`]
/// before calling [`BatteryStore::get`] / [`BatteryStore::put`]. A configurable
/// usable floor reserves a fraction of the capacity that dispatch will not
/// discharge below.
#[derive(Debug, Clone)]
pub struct BatteryStore {
    capacity_wh: f32,
    level_wh: f32,
    /// Minimum usable state of charge as a fraction of capacity.
    floor: f32,
}

impl BatteryStore {
    /// Creates a new battery store.
    ///
    /// # Arguments
    ///
    /// * `capacity_wh` - Total capacity in Wh (must be >= 0)
    /// * `initial_charge_wh` - Starting level in Wh (must be within capacity)
    /// * `floor` - Minimum usable state of charge, as a fraction (0.0 to 1.0)
    ///
    /// # Panics
    ///
    /// Panics if capacity is negative, the initial charge is outside
    /// `[0, capacity]`, or the floor is outside `[0.0, 1.0]`.
    pub fn new(capacity_wh: f32, initial_charge_wh: f32, floor: f32) -> Self {
        assert!(capacity_wh >= 0.0);
        assert!((0.0..=capacity_wh.max(0.0)).contains(&initial_charge_wh));
        assert!((0.0..=1.0).contains(&floor));

        Self {
            capacity_wh,
            level_wh: initial_charge_wh,
            floor,
        }
    }

    /// Draws `amount_wh` from the store.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InsufficientEnergy`] if `amount_wh` exceeds the
    /// current level. Pre-clamp with [`BatteryStore::available_energy`].
    pub fn get(&mut self, amount_wh: f32) -> Result<(), EnergyError> {
        if amount_wh > self.level_wh {
            return Err(EnergyError::InsufficientEnergy {
                requested_wh: amount_wh,
                level_wh: self.level_wh,
            });
        }
        self.level_wh -= amount_wh;
        Ok(())
    }

    /// Stores `amount_wh` into the battery.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::CapacityExceeded`] if `amount_wh` exceeds the
    /// remaining headroom. Pre-clamp with [`BatteryStore::remaining_capacity`].
    pub fn put(&mut self, amount_wh: f32) -> Result<(), EnergyError> {
        let headroom = self.remaining_capacity();
        if amount_wh > headroom {
            return Err(EnergyError::CapacityExceeded {
                requested_wh: amount_wh,
                headroom_wh: headroom,
            });
        }
        self.level_wh += amount_wh;
        Ok(())
    }

    /// Current stored energy in Wh.
    pub fn level(&self) -> f32 {
        self.level_wh
    }

    /// Total capacity in Wh.
    pub fn capacity(&self) -> f32 {
        self.capacity_wh
    }

    /// Headroom left for charging, in Wh.
    pub fn remaining_capacity(&self) -> f32 {
        self.capacity_wh - self.level_wh
    }

    /// Energy available for discharge above the usable floor, in Wh.
    pub fn available_energy(&self) -> f32 {
        (self.level_wh - self.floor * self.capacity_wh).max(0.0)
    }

    /// State of charge as a percentage. Defined as 0 for a zero-capacity store.
    pub fn percentage(&self) -> f32 {
        if self.capacity_wh == 0.0 {
            0.0
        } else {
            self.level_wh / self.capacity_wh * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battery() {
        let battery = BatteryStore::new(13500.0, 2000.0, 0.05);
        assert_eq!(battery.capacity(), 13500.0);
        assert_eq!(battery.level(), 2000.0);
        assert_eq!(battery.remaining_capacity(), 11500.0);
    }

    #[test]
    #[should_panic]
    fn test_initial_charge_over_capacity_panics() {
        BatteryStore::new(1000.0, 1500.0, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_floor_panics() {
        BatteryStore::new(1000.0, 0.0, 1.5);
    }

    #[test]
    fn get_within_level_succeeds() {
        let mut battery = BatteryStore::new(1000.0, 600.0, 0.0);
        assert!(battery.get(400.0).is_ok());
        assert_eq!(battery.level(), 200.0);
    }

    #[test]
    fn get_beyond_level_fails_without_mutation() {
        let mut battery = BatteryStore::new(1000.0, 300.0, 0.0);
        let err = battery.get(300.5).expect_err("must fail");
        assert!(matches!(err, EnergyError::InsufficientEnergy { .. }));
        assert_eq!(battery.level(), 300.0);
    }

    #[test]
    fn put_within_headroom_succeeds() {
        let mut battery = BatteryStore::new(1000.0, 900.0, 0.0);
        assert!(battery.put(100.0).is_ok());
        assert_eq!(battery.level(), 1000.0);
        assert_eq!(battery.remaining_capacity(), 0.0);
    }

    #[test]
    fn put_beyond_headroom_fails_without_mutation() {
        let mut battery = BatteryStore::new(1000.0, 900.0, 0.0);
        let err = battery.put(150.0).expect_err("must fail");
        assert!(matches!(err, EnergyError::CapacityExceeded { .. }));
        assert_eq!(battery.level(), 900.0);
    }

    #[test]
    fn available_energy_respects_floor() {
        // 5% floor on 13500 Wh reserves 675 Wh.
        let battery = BatteryStore::new(13500.0, 2000.0, 0.05);
        assert!((battery.available_energy() - 1325.0).abs() < 1e-3);

        let drained = BatteryStore::new(13500.0, 500.0, 0.05);
        assert_eq!(drained.available_energy(), 0.0);
    }

    #[test]
    fn percentage_of_zero_capacity_is_zero() {
        let battery = BatteryStore::new(0.0, 0.0, 0.0);
        assert_eq!(battery.percentage(), 0.0);
    }

    #[test]
    fn percentage_tracks_level() {
        let battery = BatteryStore::new(10000.0, 2500.0, 0.0);
        assert!((battery.percentage() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn error_messages_name_the_amounts() {
        let mut battery = BatteryStore::new(100.0, 10.0, 0.0);
        let err = battery.get(50.0).expect_err("must fail");
        let msg = format!("{err}");
        assert!(msg.contains("insufficient energy"));
        assert!(msg.contains("50.000"));
    }
}
