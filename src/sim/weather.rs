//! Stochastic daily weather: season-weighted sky condition and cloud coverage.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Meteorological season, derived from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Maps a calendar month (1-12) to its season.
    ///
    /// # Panics
    ///
    /// Panics if `month` is outside `1..=12`.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => panic!("month must be in 1..=12, got {month}"),
        }
    }

    /// Row index into the season-indexed probability table.
    fn index(&self) -> usize {
        match self {
            Season::Winter => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Winter => "WINTER",
            Season::Spring => "SPRING",
            Season::Summer => "SUMMER",
            Season::Fall => "FALL",
        };
        write!(f, "{s}")
    }
}

/// Sky condition, sampled once per simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyCondition {
    Clear,
    PartlyCloudy,
    MostlyCloudy,
    Overcast,
}

impl SkyCondition {
    /// All conditions, in probability-table column order.
    pub const ALL: [SkyCondition; 4] = [
        SkyCondition::Clear,
        SkyCondition::PartlyCloudy,
        SkyCondition::MostlyCloudy,
        SkyCondition::Overcast,
    ];
}

impl fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkyCondition::Clear => "CLEAR",
            SkyCondition::PartlyCloudy => "PARTLY_CLOUDY",
            SkyCondition::MostlyCloudy => "MOSTLY_CLOUDY",
            SkyCondition::Overcast => "OVERCAST",
        };
        write!(f, "{s}")
    }
}

/// Weather for the current simulated day. Immutable between day boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherState {
    pub season: Season,
    pub condition: SkyCondition,
    /// Cloud coverage, 0.0 (clear sky) to 1.0 (fully overcast).
    pub cloud_cover: f32,
}

/// Samples one sky condition and cloud coverage per simulated day.
///
/// Condition weights depend on the season (a 4x4 configuration table);
/// cloud coverage is then drawn uniformly from the `[min, max]` range
/// associated with the chosen condition. Holds its own seeded RNG so runs
/// are reproducible without process-wide random state.
pub struct WeatherGenerator {
    /// One weighted condition distribution per season, indexed by [`Season::index`].
    condition_dists: [WeightedIndex<f32>; 4],
    /// Cloud coverage `[min, max]` per condition, in [`SkyCondition::ALL`] order.
    cloud_ranges: [[f32; 2]; 4],
    rng: StdRng,
    state: WeatherState,
}

impl WeatherGenerator {
    /// Creates a weather generator from the configuration tables.
    ///
    /// # Arguments
    ///
    /// * `season_weights` - Condition weights per season, rows in
    ///   winter/spring/summer/fall order, columns in [`SkyCondition::ALL`] order
    /// * `cloud_ranges` - Coverage `[min, max]` per condition
    /// * `start_season` - Season of the simulation start date (initial state)
    /// * `seed` - Random seed for reproducible sampling
    ///
    /// # Panics
    ///
    /// Panics if a season row has negative weights or sums to zero, or if a
    /// cloud range is inverted or outside `[0.0, 1.0]`.
    pub fn new(
        season_weights: &[[f32; 4]; 4],
        cloud_ranges: &[[f32; 2]; 4],
        start_season: Season,
        seed: u64,
    ) -> Self {
        for row in season_weights {
            assert!(row.iter().all(|w| *w >= 0.0), "condition weights must be >= 0");
            assert!(row.iter().sum::<f32>() > 0.0, "condition weights must not all be zero");
        }
        for range in cloud_ranges {
            assert!(
                0.0 <= range[0] && range[0] <= range[1] && range[1] <= 1.0,
                "cloud range must satisfy 0 <= min <= max <= 1"
            );
        }

        let condition_dists = season_weights
            .each_ref()
            .map(|row| WeightedIndex::new(row).expect("weights validated above"));

        Self {
            condition_dists,
            cloud_ranges: *cloud_ranges,
            rng: StdRng::seed_from_u64(seed),
            state: WeatherState {
                season: start_season,
                condition: SkyCondition::Clear,
                cloud_cover: 0.0,
            },
        }
    }

    /// Samples the weather for a new simulated day.
    ///
    /// Must be called exactly once per day boundary; each call consumes
    /// randomness and overwrites the current [`WeatherState`].
    pub fn update(&mut self, date: NaiveDate) {
        let season = Season::from_month(date.month());
        let condition = SkyCondition::ALL[self.condition_dists[season.index()].sample(&mut self.rng)];
        let [min, max] = self.cloud_ranges[Self::condition_index(condition)];
        let cloud_cover = self.rng.random_range(min..=max);

        self.state = WeatherState {
            season,
            condition,
            cloud_cover,
        };
    }

    /// Weather for the current simulated day.
    pub fn state(&self) -> WeatherState {
        self.state
    }

    fn condition_index(condition: SkyCondition) -> usize {
        match condition {
            SkyCondition::Clear => 0,
            SkyCondition::PartlyCloudy => 1,
            SkyCondition::MostlyCloudy => 2,
            SkyCondition::Overcast => 3,
        }
    }
}
