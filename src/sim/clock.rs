//! Simulated clock: discrete tick iteration plus time-of-day derivations.

/// The simulation's notion of time.
///
/// Advances tick by tick over a fixed horizon and owns the mapping from a
/// tick index to simulated time: the real-valued hour count, the day index,
/// and the hour within the current day. Components that need to know "what
/// time is it" ask the clock rather than re-deriving from the tick duration.
///
/// # Examples
///
/// ```
/// use greengrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(48, 24, 1.0);
/// assert_eq!(clock.tick(), Some(0));
/// assert_eq!(clock.day_index(30), 1);
/// assert_eq!(clock.hour_of_day(30), 6.0);
/// assert!(clock.is_day_start(24));
/// ```
pub struct Clock {
    current: usize,
    total: usize,
    ticks_per_day: usize,
    /// Duration of one tick in hours.
    dt_hours: f32,
}

impl Clock {
    /// Creates a clock spanning `total` ticks.
    ///
    /// # Arguments
    ///
    /// * `total` - Horizon in ticks
    /// * `ticks_per_day` - Ticks per simulated day (must be > 0)
    /// * `dt_hours` - Tick duration in hours (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `ticks_per_day` is zero or `dt_hours` is not positive.
    pub fn new(total: usize, ticks_per_day: usize, dt_hours: f32) -> Self {
        assert!(ticks_per_day > 0, "ticks_per_day must be > 0");
        assert!(dt_hours > 0.0, "dt_hours must be > 0");
        Self {
            current: 0,
            total,
            ticks_per_day,
            dt_hours,
        }
    }

    /// Advances to the next tick.
    ///
    /// # Returns
    ///
    /// `Some(t)` with the tick index being entered, or `None` once the
    /// horizon is exhausted.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let t = self.current;
            self.current += 1;
            Some(t)
        } else {
            None
        }
    }

    /// Simulated time in hours at tick `t`.
    pub fn time_hr(&self, t: usize) -> f32 {
        t as f32 * self.dt_hours
    }

    /// Day index (0-based) at tick `t`.
    pub fn day_index(&self, t: usize) -> usize {
        t / self.ticks_per_day
    }

    /// Hour within the current day at tick `t`, in `[0.0, 24.0)`.
    pub fn hour_of_day(&self, t: usize) -> f32 {
        (t % self.ticks_per_day) as f32 * self.dt_hours
    }

    /// Returns `true` when tick `t` is the first tick of a simulated day.
    pub fn is_day_start(&self, t: usize) -> bool {
        t % self.ticks_per_day == 0
    }
}
