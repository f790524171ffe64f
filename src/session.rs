use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::estimator::{MotionEstimator, Rejection, MS_TO_KMH};
use crate::types::{Sample, Snapshot};

/// Per-match aggregate handed to whatever stores match statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub start_time: String,
    pub sample_count: u32,
    pub accepted_count: u32,
    pub glitch_count: u32,
    pub overspeed_count: u32,
    pub reordered_count: u32,
    pub clamped_count: u32,
    pub total_distance_meters: f64,
    pub elapsed_seconds: u64,
    pub band4_distance_meters: f64,
    pub band5_distance_meters: f64,
    pub band4_seconds: u64,
    pub band5_seconds: u64,
    pub peak_speed_ms: f64,
    pub peak_speed_kmh: f64,
}

/// One tracked player for one match.
///
/// Owns its estimator exclusively; a single producer pushes samples in
/// arrival order.
pub struct TrackingSession {
    session_id: String,
    start_time: String,
    estimator: MotionEstimator,
    sample_count: u32,
    accepted_count: u32,
    glitch_count: u32,
    overspeed_count: u32,
    reordered_count: u32,
    clamped_count: u32,
    band4_seconds: u64,
    band5_seconds: u64,
    peak_speed_ms: f64,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self::from_estimator(MotionEstimator::new())
    }

    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        Ok(Self::from_estimator(MotionEstimator::with_config(config)?))
    }

    fn from_estimator(estimator: MotionEstimator) -> Self {
        let now = Utc::now();
        let session = TrackingSession {
            session_id: format!("session_{}", now.timestamp_millis()),
            start_time: now.to_rfc3339(),
            estimator,
            sample_count: 0,
            accepted_count: 0,
            glitch_count: 0,
            overspeed_count: 0,
            reordered_count: 0,
            clamped_count: 0,
            band4_seconds: 0,
            band5_seconds: 0,
            peak_speed_ms: 0.0,
        };
        log::info!("Tracking session {} started", session.session_id);
        session
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn estimator(&self) -> &MotionEstimator {
        &self.estimator
    }

    /// Feed one sample through the estimator and tally its outcome
    pub fn push(&mut self, sample: Sample) -> Snapshot {
        let step = self.estimator.step(sample);
        let snapshot = step.snapshot;
        let condition = step.condition;

        self.sample_count += 1;
        if condition.reordered {
            self.reordered_count += 1;
        }
        if condition.interval_clamped {
            self.clamped_count += 1;
        }
        match condition.rejection {
            Some(Rejection::PositionGlitch { .. }) => self.glitch_count += 1,
            Some(Rejection::OverSpeed { .. }) => self.overspeed_count += 1,
            None if !condition.baseline => self.accepted_count += 1,
            None => {}
        }

        if snapshot.velocity_ms > self.peak_speed_ms {
            self.peak_speed_ms = snapshot.velocity_ms;
        }

        let config = self.estimator.config();
        if config.band4.contains(snapshot.velocity_ms) {
            self.band4_seconds += snapshot.time_step;
        }
        if config.band5.contains(snapshot.velocity_ms) {
            self.band5_seconds += snapshot.time_step;
        }

        snapshot
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            start_time: self.start_time.clone(),
            sample_count: self.sample_count,
            accepted_count: self.accepted_count,
            glitch_count: self.glitch_count,
            overspeed_count: self.overspeed_count,
            reordered_count: self.reordered_count,
            clamped_count: self.clamped_count,
            total_distance_meters: self.estimator.total_distance(),
            elapsed_seconds: self.estimator.accumulated_time(),
            band4_distance_meters: self.estimator.band4_distance(),
            band5_distance_meters: self.estimator.band5_distance(),
            band4_seconds: self.band4_seconds,
            band5_seconds: self.band5_seconds,
            peak_speed_ms: self.peak_speed_ms,
            peak_speed_kmh: self.peak_speed_ms * MS_TO_KMH,
        }
    }

    /// End the session, handing back the estimator
    pub fn into_estimator(self) -> MotionEstimator {
        log::info!(
            "Tracking session {} ended: {} samples, {:.1} m",
            self.session_id,
            self.sample_count,
            self.estimator.total_distance()
        );
        self.estimator
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::haversine_distance;
    use approx::assert_relative_eq;
    use chrono::DateTime;

    fn at(secs: i64, lat: f64, lon: f64) -> Sample {
        Sample::new(DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap(), lat, lon)
    }

    #[test]
    fn test_session_id_format() {
        let session = TrackingSession::new();
        assert!(session.session_id().starts_with("session_"));
        assert_eq!(session.summary().sample_count, 0);
    }

    #[test]
    fn test_counts_outcomes() {
        let mut session = TrackingSession::new();
        session.push(at(0, 0.0, 0.0)); // baseline
        session.push(at(10, 0.0, 0.00005)); // accepted
        session.push(at(11, 0.0, 0.00105)); // glitch
        session.push(at(12, 0.0, 0.00115)); // overspeed
        session.push(at(8, 0.0, 0.00116)); // reordered, accepted
        session.push(at(8, 0.0, 0.00116)); // clamped, accepted

        let summary = session.summary();
        assert_eq!(summary.sample_count, 6);
        assert_eq!(summary.accepted_count, 3);
        assert_eq!(summary.glitch_count, 1);
        assert_eq!(summary.overspeed_count, 1);
        assert_eq!(summary.reordered_count, 1);
        assert_eq!(summary.clamped_count, 1);
    }

    #[test]
    fn test_band_time_and_peak_speed() {
        let mut session = TrackingSession::new();
        session.push(at(0, 0.0, 0.0));
        session.push(at(1, 0.0, 0.00004)); // ~4.45 m/s, band 4
        session.push(at(2, 0.0, 0.0001)); // ~6.67 m/s, band 5
        session.push(at(4, 0.0, 0.0001)); // stationary

        let summary = session.summary();
        let peak = haversine_distance(0.0, 0.00004, 0.0, 0.0001);
        assert_eq!(summary.band4_seconds, 1);
        assert_eq!(summary.band5_seconds, 1);
        assert_eq!(summary.elapsed_seconds, 4);
        assert_relative_eq!(summary.peak_speed_ms, peak);
        assert_relative_eq!(summary.peak_speed_kmh, peak * MS_TO_KMH);
        assert_relative_eq!(
            summary.total_distance_meters,
            haversine_distance(0.0, 0.0, 0.0, 0.0001),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_into_estimator_keeps_totals() {
        let mut session = TrackingSession::new();
        session.push(at(0, 0.0, 0.0));
        session.push(at(10, 0.0, 0.00005));
        let distance = session.summary().total_distance_meters;

        let estimator = session.into_estimator();
        assert_eq!(estimator.total_distance(), distance);
        assert!(estimator.is_tracking());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = EstimatorConfig {
            max_speed_kmh: f64::NAN,
            ..EstimatorConfig::default()
        };
        assert!(TrackingSession::with_config(config).is_err());
        assert!(TrackingSession::with_config(EstimatorConfig::default()).is_ok());
    }
}
