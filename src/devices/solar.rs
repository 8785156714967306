/// A solar panel with a sinusoidal day/night generation model.
///
/// The sun angle sweeps half a sine period between 06:00 and 18:00, so
/// output peaks at solar noon and is zero overnight. Cloud attenuation is a
/// configuration decision and is off by default.
#[derive(Debug, Clone)]
pub struct SolarPanel {
    /// Peak output in watts under a clear midday sky.
    pub peak_w: f32,
    /// Whether generation is scaled by `1 - cloud_cover`.
    pub cloud_attenuation: bool,
}

impl SolarPanel {
    /// Creates a panel with the given peak output in watts.
    ///
    /// # Arguments
    ///
    /// * `peak_w` - Peak output in watts (negative values clamp to zero)
    /// * `cloud_attenuation` - Whether cloud coverage attenuates generation
    pub fn new(peak_w: f32, cloud_attenuation: bool) -> Self {
        Self {
            peak_w: peak_w.max(0.0),
            cloud_attenuation,
        }
    }

    /// Instantaneous generation in watts at the given hour of day.
    ///
    /// Pure function of time and weather: `peak * sin((h - 6) * pi / 12)`,
    /// clamped at zero, optionally scaled by `1 - cloud_cover`.
    pub fn generation_w(&self, hour_of_day: f32, cloud_cover: f32) -> f32 {
        let sun_angle = (hour_of_day - 6.0) * (std::f32::consts::PI / 12.0);
        let mut generation = self.peak_w * sun_angle.sin();
        if self.cloud_attenuation {
            generation *= 1.0 - cloud_cover;
        }
        generation.max(0.0)
    }
}
