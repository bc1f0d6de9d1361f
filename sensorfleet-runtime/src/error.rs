//! Runtime errors
//!
//! Everything here is fatal and happens before the first cycle runs, except
//! [`RuntimeError::Task`], which reports a sensor task that panicked.

use std::path::PathBuf;

use sensorfleet_connectors::SinkError;
use sensorfleet_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Config file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has the wrong shape
    #[error("malformed config: {0}")]
    ParseConfig(#[from] serde_json::Error),

    /// A sensor entry failed validation
    #[error("sensor `{name}`: {source}")]
    Sensor {
        name: String,
        #[source]
        source: ConfigError,
    },

    /// Fleet-level setting out of range
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Sink could not be constructed
    #[error("sink setup failed: {0}")]
    Sink(#[from] SinkError),

    /// A sensor task panicked or was cancelled
    #[error("sensor task `{name}` failed: {reason}")]
    Task { name: String, reason: String },
}

impl RuntimeError {
    pub(crate) fn sensor(name: &str, source: ConfigError) -> Self {
        Self::Sensor {
            name: name.to_owned(),
            source,
        }
    }
}
