use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, TrackerError};

/// Closed-open velocity interval `[low_ms, high_ms)` in m/s.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedBand {
    pub low_ms: f64,
    pub high_ms: f64,
}

impl SpeedBand {
    pub const fn new(low_ms: f64, high_ms: f64) -> Self {
        Self { low_ms, high_ms }
    }

    pub fn contains(&self, velocity_ms: f64) -> bool {
        velocity_ms >= self.low_ms && velocity_ms < self.high_ms
    }
}

/// Outlier thresholds and speed bands for [`crate::MotionEstimator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Step distances above this are treated as GPS fix glitches (meters)
    #[serde(default = "default_glitch_distance_m")]
    pub glitch_distance_m: f64,
    /// Implied speeds above this are implausible for the activity (km/h)
    #[serde(default = "default_max_speed_kmh")]
    pub max_speed_kmh: f64,
    #[serde(default = "default_band4")]
    pub band4: SpeedBand,
    #[serde(default = "default_band5")]
    pub band5: SpeedBand,
}

fn default_glitch_distance_m() -> f64 {
    100.0
}

fn default_max_speed_kmh() -> f64 {
    40.0
}

fn default_band4() -> SpeedBand {
    SpeedBand::new(4.0, 5.5)
}

fn default_band5() -> SpeedBand {
    SpeedBand::new(5.5, 7.0)
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            glitch_distance_m: default_glitch_distance_m(),
            max_speed_kmh: default_max_speed_kmh(),
            band4: default_band4(),
            band5: default_band5(),
        }
    }
}

impl EstimatorConfig {
    /// Load from a JSON file; missing fields fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.glitch_distance_m.is_finite() && self.glitch_distance_m > 0.0) {
            return Err(TrackerError::InvalidConfig(format!(
                "glitch_distance_m must be positive, got {}",
                self.glitch_distance_m
            )));
        }
        if !(self.max_speed_kmh.is_finite() && self.max_speed_kmh > 0.0) {
            return Err(TrackerError::InvalidConfig(format!(
                "max_speed_kmh must be positive, got {}",
                self.max_speed_kmh
            )));
        }
        for (name, band) in [("band4", &self.band4), ("band5", &self.band5)] {
            if !(band.low_ms.is_finite() && band.high_ms.is_finite())
                || band.low_ms < 0.0
                || band.low_ms >= band.high_ms
            {
                return Err(TrackerError::InvalidConfig(format!(
                    "{name} must satisfy 0 <= low < high, got [{}, {})",
                    band.low_ms, band.high_ms
                )));
            }
        }
        if self.band4.low_ms < self.band5.high_ms && self.band5.low_ms < self.band4.high_ms {
            return Err(TrackerError::InvalidConfig(format!(
                "band4 [{}, {}) and band5 [{}, {}) overlap",
                self.band4.low_ms, self.band4.high_ms, self.band5.low_ms, self.band5.high_ms
            )));
        }
        Ok(())
    }
}
