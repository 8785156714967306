//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::sim::types::DispatchStrategy;

/// Date format used in scenario files, e.g. `"01/05/2026"`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Inverter clipping and failure parameters.
    #[serde(default)]
    pub inverter: InverterConfig,
    /// Grid export limit.
    #[serde(default)]
    pub grid: GridConfig,
    /// Solar panel parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Household demand parameters.
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Import/export pricing.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Weather probability tables.
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Tick duration in minutes (must evenly divide a 24-hour day).
    pub minutes_per_tick: u32,
    /// Master random seed.
    pub seed: u64,
    /// Start date in `DD/MM/YYYY` format.
    pub start_date: String,
    /// Dispatch strategy: `"load"`, `"charge"`, or `"produce"`.
    pub strategy: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 30,
            minutes_per_tick: 60,
            seed: 42,
            start_date: "01/05/2026".to_string(),
            strategy: "load".to_string(),
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total capacity (Wh).
    pub capacity_wh: f32,
    /// Starting level (Wh).
    pub initial_charge_wh: f32,
    /// Minimum usable state of charge, as a fraction (0.0–1.0).
    pub floor: f32,
    /// Round-trip efficiency (0.0–1.0).
    pub round_trip_efficiency: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_wh: 13500.0,
            initial_charge_wh: 0.0,
            floor: 0.05,
            round_trip_efficiency: 0.95,
        }
    }
}

/// Inverter clipping and failure parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterConfig {
    /// Maximum generation passed through (W).
    pub clipping_w: f32,
    /// Per-tick failure probability while operating (0.0–1.0).
    pub fail_probability: f32,
    /// Minimum sampled downtime (hours).
    pub min_fail_duration_h: u32,
    /// Maximum sampled downtime (hours).
    pub max_fail_duration_h: u32,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            clipping_w: 4000.0,
            fail_probability: 0.01,
            min_fail_duration_h: 4,
            max_fail_duration_h: 72,
        }
    }
}

/// Grid export limit.
///
/// The same value serves as the cumulative export quota (Wh) and as the
/// per-tick export ceiling of the PRODUCE strategy (W).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Export limit (Wh quota / W ceiling).
    pub export_limit: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            export_limit: 20000.0,
        }
    }
}

/// Solar panel parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Peak output under a clear midday sky (W).
    pub peak_w: f32,
    /// Whether cloud coverage attenuates generation.
    pub cloud_attenuation: bool,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            peak_w: 5000.0,
            cloud_attenuation: false,
        }
    }
}

/// Household demand parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdConfig {
    /// Baseline consumption (W).
    pub base_load_w: f32,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self { base_load_w: 500.0 }
    }
}

/// Import/export pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    /// Price paid per imported kWh.
    pub import_cost_per_kwh: f32,
    /// Revenue earned per exported kWh.
    pub export_rate_per_kwh: f32,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            import_cost_per_kwh: 0.75,
            export_rate_per_kwh: 0.90,
        }
    }
}

/// Weather probability tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Sky-condition weights per season.
    pub season_weights: SeasonWeights,
    /// Cloud-coverage `[min, max]` range per condition.
    pub cloud_cover: CloudRanges,
}

/// Sky-condition weights per season, columns in
/// clear/partly_cloudy/mostly_cloudy/overcast order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonWeights {
    pub winter: [f32; 4],
    pub spring: [f32; 4],
    pub summer: [f32; 4],
    pub fall: [f32; 4],
}

impl Default for SeasonWeights {
    fn default() -> Self {
        Self {
            winter: [0.1, 0.2, 0.3, 0.4],
            spring: [0.3, 0.4, 0.2, 0.1],
            summer: [0.6, 0.3, 0.1, 0.0],
            fall: [0.3, 0.3, 0.3, 0.1],
        }
    }
}

/// Cloud-coverage `[min, max]` per condition.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudRanges {
    pub clear: [f32; 2],
    pub partly_cloudy: [f32; 2],
    pub mostly_cloudy: [f32; 2],
    pub overcast: [f32; 2],
}

impl Default for CloudRanges {
    fn default() -> Self {
        Self {
            clear: [0.0, 0.2],
            partly_cloudy: [0.2, 0.6],
            mostly_cloudy: [0.6, 0.8],
            overcast: [0.8, 0.9],
        }
    }
}

impl WeatherConfig {
    /// Season-indexed weight table in winter/spring/summer/fall row order.
    pub fn season_weight_table(&self) -> [[f32; 4]; 4] {
        [
            self.season_weights.winter,
            self.season_weights.spring,
            self.season_weights.summer,
            self.season_weights.fall,
        ]
    }

    /// Condition-indexed cloud ranges in clear/partly/mostly/overcast order.
    pub fn cloud_range_table(&self) -> [[f32; 2]; 4] {
        [
            self.cloud_cover.clear,
            self.cloud_cover.partly_cloudy,
            self.cloud_cover.mostly_cloudy,
            self.cloud_cover.overcast,
        ]
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (a May start with the default tables).
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig::default(),
            inverter: InverterConfig::default(),
            grid: GridConfig::default(),
            solar: SolarConfig::default(),
            household: HouseholdConfig::default(),
            economics: EconomicsConfig::default(),
            weather: WeatherConfig::default(),
        }
    }

    /// Returns the sunny-summer preset: July start, larger array, rare failures.
    pub fn sunny_summer() -> Self {
        Self {
            simulation: SimulationConfig {
                start_date: "01/07/2026".to_string(),
                ..SimulationConfig::default()
            },
            solar: SolarConfig {
                peak_w: 6000.0,
                ..SolarConfig::default()
            },
            inverter: InverterConfig {
                fail_probability: 0.005,
                ..InverterConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the stormy-winter preset: December start, cloud attenuation on,
    /// heavier skies and more frequent failures.
    pub fn stormy_winter() -> Self {
        Self {
            simulation: SimulationConfig {
                start_date: "01/12/2026".to_string(),
                ..SimulationConfig::default()
            },
            solar: SolarConfig {
                cloud_attenuation: true,
                ..SolarConfig::default()
            },
            inverter: InverterConfig {
                fail_probability: 0.03,
                ..InverterConfig::default()
            },
            weather: WeatherConfig {
                season_weights: SeasonWeights {
                    winter: [0.05, 0.15, 0.3, 0.5],
                    ..SeasonWeights::default()
                },
                ..WeatherConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sunny_summer", "stormy_winter"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sunny_summer" => Ok(Self::sunny_summer()),
            "stormy_winter" => Ok(Self::stormy_winter()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses the configured start date.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the date is not valid `DD/MM/YYYY`.
    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::parse_from_str(&self.simulation.start_date, DATE_FORMAT).map_err(|e| {
            ConfigError {
                field: "simulation.start_date".to_string(),
                message: format!(
                    "\"{}\" is not a valid DD/MM/YYYY date: {e}",
                    self.simulation.start_date
                ),
            }
        })
    }

    /// Parses the configured dispatch strategy.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the strategy name is unknown.
    pub fn strategy(&self) -> Result<DispatchStrategy, ConfigError> {
        DispatchStrategy::from_name(&self.simulation.strategy).ok_or_else(|| ConfigError {
            field: "simulation.strategy".to_string(),
            message: format!(
                "must be \"load\", \"charge\", or \"produce\", got \"{}\"",
                self.simulation.strategy
            ),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.days == 0 {
            errors.push(ConfigError {
                field: "simulation.days".into(),
                message: "must be > 0".into(),
            });
        }
        if s.minutes_per_tick == 0 || 1440 % s.minutes_per_tick != 0 {
            errors.push(ConfigError {
                field: "simulation.minutes_per_tick".into(),
                message: "must evenly divide a 24-hour day".into(),
            });
        }
        if let Err(e) = self.start_date() {
            errors.push(e);
        }
        if let Err(e) = self.strategy() {
            errors.push(e);
        }

        let bat = &self.battery;
        if bat.capacity_wh < 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_wh".into(),
                message: "must be >= 0".into(),
            });
        }
        if bat.initial_charge_wh < 0.0 || bat.initial_charge_wh > bat.capacity_wh.max(0.0) {
            errors.push(ConfigError {
                field: "battery.initial_charge_wh".into(),
                message: "must be in [0, battery.capacity_wh]".into(),
            });
        }
        if !(0.0..=1.0).contains(&bat.floor) {
            errors.push(ConfigError {
                field: "battery.floor".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(bat.round_trip_efficiency > 0.0 && bat.round_trip_efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "battery.round_trip_efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        let inv = &self.inverter;
        if inv.clipping_w < 0.0 {
            errors.push(ConfigError {
                field: "inverter.clipping_w".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&inv.fail_probability) {
            errors.push(ConfigError {
                field: "inverter.fail_probability".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if inv.min_fail_duration_h > inv.max_fail_duration_h {
            errors.push(ConfigError {
                field: "inverter.min_fail_duration_h".into(),
                message: "must be <= inverter.max_fail_duration_h".into(),
            });
        }

        if self.grid.export_limit < 0.0 {
            errors.push(ConfigError {
                field: "grid.export_limit".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.solar.peak_w < 0.0 {
            errors.push(ConfigError {
                field: "solar.peak_w".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.household.base_load_w < 0.0 {
            errors.push(ConfigError {
                field: "household.base_load_w".into(),
                message: "must be >= 0".into(),
            });
        }

        let eco = &self.economics;
        if eco.import_cost_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "economics.import_cost_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if eco.export_rate_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "economics.export_rate_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        let seasons = [
            ("winter", &self.weather.season_weights.winter),
            ("spring", &self.weather.season_weights.spring),
            ("summer", &self.weather.season_weights.summer),
            ("fall", &self.weather.season_weights.fall),
        ];
        for (name, row) in seasons {
            if row.iter().any(|w| *w < 0.0) || row.iter().sum::<f32>() <= 0.0 {
                errors.push(ConfigError {
                    field: format!("weather.season_weights.{name}"),
                    message: "weights must be >= 0 and not all zero".into(),
                });
            }
        }

        let ranges = [
            ("clear", &self.weather.cloud_cover.clear),
            ("partly_cloudy", &self.weather.cloud_cover.partly_cloudy),
            ("mostly_cloudy", &self.weather.cloud_cover.mostly_cloudy),
            ("overcast", &self.weather.cloud_cover.overcast),
        ];
        for (name, range) in ranges {
            if !(0.0 <= range[0] && range[0] <= range[1] && range[1] <= 1.0) {
                errors.push(ConfigError {
                    field: format!("weather.cloud_cover.{name}"),
                    message: "must satisfy 0 <= min <= max <= 1".into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
days = 7
minutes_per_tick = 30
seed = 99
start_date = "15/06/2026"
strategy = "produce"

[battery]
capacity_wh = 10000.0
initial_charge_wh = 5000.0
floor = 0.1
round_trip_efficiency = 0.9

[inverter]
clipping_w = 3500.0
fail_probability = 0.02
min_fail_duration_h = 2
max_fail_duration_h = 48

[grid]
export_limit = 15000.0

[solar]
peak_w = 4500.0
cloud_attenuation = true

[household]
base_load_w = 650.0

[economics]
import_cost_per_kwh = 0.80
export_rate_per_kwh = 0.85

[weather.season_weights]
winter = [0.1, 0.2, 0.3, 0.4]
spring = [0.25, 0.25, 0.25, 0.25]
summer = [0.7, 0.2, 0.1, 0.0]
fall = [0.3, 0.3, 0.3, 0.1]

[weather.cloud_cover]
clear = [0.0, 0.1]
partly_cloudy = [0.1, 0.5]
mostly_cloudy = [0.5, 0.8]
overcast = [0.8, 1.0]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(7));
        assert_eq!(cfg.as_ref().map(|c| &*c.simulation.strategy), Some("produce"));
        assert_eq!(cfg.as_ref().map(|c| c.solar.cloud_attenuation), Some(true));
        assert_eq!(
            cfg.as_ref().map(|c| c.weather.season_weights.summer),
            Some([0.7, 0.2, 0.1, 0.0])
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(30));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_wh), Some(13500.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
days = 30
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn validation_catches_uneven_tick() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.minutes_per_tick = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.minutes_per_tick"));
    }

    #[test]
    fn validation_catches_bad_date() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.start_date = "2026-05-01".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.start_date"));
    }

    #[test]
    fn validation_catches_bad_strategy() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.strategy = "greedy".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.strategy"));
    }

    #[test]
    fn validation_catches_overfull_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.initial_charge_wh = cfg.battery.capacity_wh + 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_charge_wh"));
    }

    #[test]
    fn validation_catches_inverted_fail_durations() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.inverter.min_fail_duration_h = 80;
        cfg.inverter.max_fail_duration_h = 72;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "inverter.min_fail_duration_h"));
    }

    #[test]
    fn validation_catches_zero_weight_season() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.weather.season_weights.spring = [0.0; 4];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather.season_weights.spring"));
    }

    #[test]
    fn validation_catches_inverted_cloud_range() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.weather.cloud_cover.overcast = [0.9, 0.8];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather.cloud_cover.overcast"));
    }

    #[test]
    fn start_date_parses_day_first() {
        let cfg = ScenarioConfig::baseline();
        let date = cfg.start_date().expect("baseline date parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date"));
    }

    #[test]
    fn strategy_parses_to_enum() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.strategy = "charge".to_string();
        assert_eq!(cfg.strategy().ok(), Some(DispatchStrategy::Charge));
    }

    #[test]
    fn weather_tables_follow_declaration_order() {
        let cfg = ScenarioConfig::baseline();
        let weights = cfg.weather.season_weight_table();
        assert_eq!(weights[0], cfg.weather.season_weights.winter);
        assert_eq!(weights[2], cfg.weather.season_weights.summer);
        let ranges = cfg.weather.cloud_range_table();
        assert_eq!(ranges[0], cfg.weather.cloud_cover.clear);
        assert_eq!(ranges[3], cfg.weather.cloud_cover.overcast);
    }
}
