//! Error taxonomy for chart loading, configuration and transport control.

use std::path::PathBuf;

/// Invalid tempo timeline. Fatal to loading the chart that uses it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartTimingError {
    #[error("tempo timeline has no BPM segments")]
    Empty,
    #[error("first BPM segment starts at beat {0}, expected 0")]
    MissingZeroSegment(f64),
    #[error("BPM segment at beat {current} does not come after beat {previous}")]
    NonIncreasing { previous: f64, current: f64 },
    #[error("BPM segment at beat {beat} has non-positive tempo {bpm}")]
    NonPositiveBpm { beat: f64, bpm: f64 },
    #[error("tempo timeline contains a non-finite {0}")]
    NonFiniteValue(&'static str),
    #[error("chart resolution must be greater than zero")]
    ZeroResolution,
}

/// Missing or malformed chart source data.
#[derive(Debug, thiserror::Error)]
pub enum ChartDataError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("no chart named `{0}` in this song")]
    UnknownChart(String),
    #[error("timing error: {0}")]
    Timing(#[from] ChartTimingError),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One undecodable field of a memon document. Fatal only to the charts that
/// read it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<FieldError> for ChartDataError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Missing(field) => ChartDataError::MissingField(field),
            FieldError::Invalid { field, reason } => ChartDataError::InvalidField { field, reason },
        }
    }
}

/// No audio asset is loaded, so playback cannot begin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("audio transport unavailable: {reason}")]
pub struct TransportUnavailableError {
    pub reason: String,
}

impl TransportUnavailableError {
    pub fn new<T: Into<String>>(reason: T) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Settings file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
