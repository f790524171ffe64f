use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::error::{Result, TrackerError};
use crate::session::{SessionSummary, TrackingSession};
use crate::types::{Sample, Snapshot};

#[derive(Deserialize)]
#[serde(untagged)]
enum LogFile {
    Bare(Vec<Sample>),
    Wrapped { samples: Vec<Sample> },
}

impl LogFile {
    fn into_samples(self) -> Vec<Sample> {
        match self {
            LogFile::Bare(samples) | LogFile::Wrapped { samples } => samples,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub summary: SessionSummary,
    pub snapshots: Vec<Snapshot>,
}

/// Load a recorded sample log (`.json` or `.json.gz`) in file order.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let log: LogFile = serde_json::from_reader(BufReader::new(reader))?;
    let samples = log.into_samples();
    if samples.is_empty() {
        return Err(TrackerError::EmptyLog(path.display().to_string()));
    }

    log::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Run a fresh session over `samples` in the given order
pub fn replay(samples: &[Sample], config: EstimatorConfig) -> Result<ReplayOutcome> {
    let mut session = TrackingSession::with_config(config)?;
    let snapshots = samples.iter().map(|s| session.push(*s)).collect();
    Ok(ReplayOutcome {
        summary: session.summary(),
        snapshots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;

    const BARE: &str = r#"[
        {"timestamp": 1700000000000, "latitude": 0.0, "longitude": 0.0},
        {"timestamp": 1700000010000, "latitude": 0.0, "longitude": 0.00005,
         "xg": 0.1, "yg": 0.2, "zg": 0.3, "xa": 0.0, "ya": 9.8, "za": 0.0}
    ]"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("player_motion_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_load_bare_array() {
        let path = temp_path("bare.json");
        std::fs::write(&path, BARE).unwrap();

        let samples = load_samples(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].ya, 9.8);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_wrapped_and_gzip_match() {
        let wrapped = temp_path("wrapped.json");
        std::fs::write(&wrapped, format!(r#"{{"samples": {BARE}}}"#)).unwrap();

        let gz = temp_path("bare.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(BARE.as_bytes()).unwrap();
        std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

        assert_eq!(load_samples(&wrapped).unwrap(), load_samples(&gz).unwrap());

        std::fs::remove_file(&wrapped).ok();
        std::fs::remove_file(&gz).ok();
    }

    #[test]
    fn test_empty_log_is_error() {
        let path = temp_path("empty.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(load_samples(&path), Err(TrackerError::EmptyLog(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = temp_path("does_not_exist.json");
        assert!(matches!(load_samples(&path), Err(TrackerError::Io(_))));
    }

    #[test]
    fn test_replay_produces_one_snapshot_per_sample() {
        let samples: Vec<Sample> = serde_json::from_str(BARE).unwrap();
        let outcome = replay(&samples, EstimatorConfig::default()).unwrap();

        assert_eq!(outcome.snapshots.len(), 2);
        assert_eq!(outcome.snapshots[0], Snapshot::default());
        assert_eq!(outcome.snapshots[1].time_step, 10);
        assert_eq!(outcome.summary.sample_count, 2);
        assert_eq!(outcome.summary.accepted_count, 1);
        assert_eq!(
            outcome.summary.total_distance_meters,
            outcome.snapshots[1].total_distance
        );
    }

    #[test]
    fn test_replay_rejects_invalid_config() {
        let samples: Vec<Sample> = serde_json::from_str(BARE).unwrap();
        let config = EstimatorConfig {
            glitch_distance_m: f64::NAN,
            ..EstimatorConfig::default()
        };
        assert!(matches!(
            replay(&samples, config),
            Err(TrackerError::InvalidConfig(_))
        ));
    }
}
