//! Incremental kinematics from a stream of geolocated samples.
//!
//! One estimator per tracking session, fed strictly in arrival order. Each
//! update measures the haversine step from the baseline sample, neutralizes
//! GPS glitches and implausible speeds, and folds the accepted step into the
//! cumulative distance, time and speed-band accumulators.

use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::geodesy::haversine_distance;
use crate::types::{Sample, Snapshot};

pub(crate) const MS_TO_KMH: f64 = 3.6;

/// Why a step contributed nothing to the accumulators
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    /// Step distance exceeded the glitch threshold
    PositionGlitch { distance_m: f64 },
    /// Implied speed exceeded the activity ceiling
    OverSpeed { velocity_kmh: f64 },
}

/// Anomalies neutralized while processing one sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepCondition {
    /// First sample of the session, only established the baseline
    pub baseline: bool,
    /// Timestamp preceded the baseline; the gap was folded to its absolute value
    pub reordered: bool,
    /// Whole-second gap was zero and was clamped to one second
    pub interval_clamped: bool,
    pub rejection: Option<Rejection>,
}

impl StepCondition {
    pub fn is_accepted(&self) -> bool {
        !self.baseline && self.rejection.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub snapshot: Snapshot,
    pub condition: StepCondition,
}

pub struct MotionEstimator {
    config: EstimatorConfig,
    last_sample: Option<Sample>,
    last_velocity_ms: f64,
    total_distance: f64,
    accumulated_time: u64,
    band4_distance: f64,
    band5_distance: f64,
}

impl MotionEstimator {
    pub fn new() -> Self {
        Self::from_validated(EstimatorConfig::default())
    }

    /// Estimator with custom thresholds; rejects configs that would disable
    /// the outlier filters or let the speed bands overlap.
    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: EstimatorConfig) -> Self {
        Self {
            config,
            last_sample: None,
            last_velocity_ms: 0.0,
            total_distance: 0.0,
            accumulated_time: 0,
            band4_distance: 0.0,
            band5_distance: 0.0,
        }
    }

    /// Consume one sample and return this step's metrics.
    pub fn update(&mut self, current: Sample) -> Snapshot {
        self.step(current).snapshot
    }

    /// Same as [`update`](Self::update), also reporting which anomalies were neutralized.
    pub fn step(&mut self, current: Sample) -> Step {
        // Baseline advances unconditionally, filtered samples included
        let Some(prev) = self.last_sample.replace(current) else {
            log::debug!("Baseline established at {}", current.timestamp);
            return Step {
                snapshot: Snapshot::default(),
                condition: StepCondition {
                    baseline: true,
                    ..StepCondition::default()
                },
            };
        };

        let mut condition = StepCondition {
            reordered: current.timestamp < prev.timestamp,
            ..StepCondition::default()
        };

        let mut dt = (current.timestamp - prev.timestamp)
            .num_seconds()
            .unsigned_abs();
        if dt == 0 {
            condition.interval_clamped = true;
            dt = 1;
        }
        if condition.reordered {
            log::debug!(
                "Out-of-order sample: {} precedes baseline {}, using |dt| = {}s",
                current.timestamp,
                prev.timestamp,
                dt
            );
        }

        let mut dist = haversine_distance(
            prev.latitude,
            prev.longitude,
            current.latitude,
            current.longitude,
        );

        if dist > self.config.glitch_distance_m {
            log::debug!("GPS glitch: {:.1} m step discarded", dist);
            condition.rejection = Some(Rejection::PositionGlitch { distance_m: dist });
            dist = 0.0;
            dt = 0;
        }

        let mut velocity_ms = if dt > 0 && dist > 0.0 {
            dist / dt as f64
        } else {
            0.0
        };
        let mut velocity_kmh = velocity_ms * MS_TO_KMH;

        if velocity_kmh > self.config.max_speed_kmh {
            log::debug!("Implausible speed: {:.1} km/h step discarded", velocity_kmh);
            condition.rejection = Some(Rejection::OverSpeed { velocity_kmh });
            velocity_ms = 0.0;
            velocity_kmh = 0.0;
            dist = 0.0;
            dt = 0;
        }

        self.total_distance += dist;
        self.accumulated_time += dt;

        let acceleration_ms2 = if dt > 0 {
            (velocity_ms - self.last_velocity_ms) / dt as f64
        } else {
            0.0
        };

        if self.config.band4.contains(velocity_ms) {
            self.band4_distance += dist;
        }
        if self.config.band5.contains(velocity_ms) {
            self.band5_distance += dist;
        }

        self.last_velocity_ms = velocity_ms;

        Step {
            snapshot: Snapshot {
                velocity_ms,
                velocity_kmh,
                acceleration_ms2,
                total_distance: self.total_distance,
                time_step: dt,
                band4_distance: self.band4_distance,
                band5_distance: self.band5_distance,
            },
            condition,
        }
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn band4_distance(&self) -> f64 {
        self.band4_distance
    }

    pub fn band5_distance(&self) -> f64 {
        self.band5_distance
    }

    pub fn accumulated_time(&self) -> u64 {
        self.accumulated_time
    }

    pub fn last_velocity_ms(&self) -> f64 {
        self.last_velocity_ms
    }

    pub fn is_tracking(&self) -> bool {
        self.last_sample.is_some()
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new()
    }
}
