//! Incremental kinematics for tracked players.
//!
//! Feed geolocated samples one at a time into a [`MotionEstimator`] and read
//! back a [`Snapshot`] of instantaneous and cumulative motion metrics.

pub mod config;
pub mod error;
pub mod estimator;
pub mod geodesy;
pub mod replay;
pub mod session;
pub mod types;

pub use config::{EstimatorConfig, SpeedBand};
pub use error::{Result, TrackerError};
pub use estimator::{MotionEstimator, Rejection, Step, StepCondition};
pub use geodesy::haversine_distance;
pub use replay::{load_samples, replay, ReplayOutcome};
pub use session::{SessionSummary, TrackingSession};
pub use types::{Sample, Snapshot};
