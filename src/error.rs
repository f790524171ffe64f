use thiserror::Error;

/// Errors from the file and configuration surfaces.
///
/// The estimator itself never fails; anomalous samples are neutralized in place.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No samples in log: {0}")]
    EmptyLog(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
