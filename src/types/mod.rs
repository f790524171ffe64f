use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed instant from the tracking device.
///
/// The six axis fields are carried for forward compatibility only; nothing in
/// this crate reads them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub xg: f64,
    #[serde(default)]
    pub yg: f64,
    #[serde(default)]
    pub zg: f64,
    #[serde(default)]
    pub xa: f64,
    #[serde(default)]
    pub ya: f64,
    #[serde(default)]
    pub za: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Sample {
    /// Position-only sample, axis fields zeroed
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            xg: 0.0,
            yg: 0.0,
            zg: 0.0,
            xa: 0.0,
            ya: 0.0,
            za: 0.0,
            latitude,
            longitude,
        }
    }

    pub fn with_axes(mut self, gyro: [f64; 3], accel: [f64; 3]) -> Self {
        [self.xg, self.yg, self.zg] = gyro;
        [self.xa, self.ya, self.za] = accel;
        self
    }
}

/// Instantaneous and cumulative metrics for one update call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub velocity_ms: f64,
    pub velocity_kmh: f64,
    pub acceleration_ms2: f64,
    /// Cumulative meters
    pub total_distance: f64,
    /// Accepted whole seconds for this step, 0 when the step was filtered
    pub time_step: u64,
    /// Cumulative meters in [4.0, 5.5) m/s
    pub band4_distance: f64,
    /// Cumulative meters in [5.5, 7.0) m/s
    pub band5_distance: f64,
}
