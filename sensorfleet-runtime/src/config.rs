//! Fleet configuration
//!
//! One JSON file describes the whole fleet: how many cycles to run, where
//! the sink lives, and one entry per sensor. Kind parameters sit next to the
//! sensor's own fields and fall back to per-kind defaults:
//!
//! ```json
//! {
//!   "cycles": 100,
//!   "sink": { "base_url": "https://api.tago.io", "timeout_secs": 30, "max_retries": 2 },
//!   "sensors": [
//!     { "name": "lab-thermo", "token": "…", "interval_secs": 10, "seed": 7,
//!       "kind": "thermometer", "scale": "C", "outlier_chance": 5, "limit": 50 },
//!     { "name": "tank", "token": "…", "kind": "water_level", "max_level": 200 }
//!   ]
//! }
//! ```
//!
//! Validation happens in full before any sensor is built, so a bad entry
//! anywhere in the file stops the fleet from starting.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use sensorfleet_connectors::http::{HttpConfig, HttpSink, DEFAULT_BASE_URL};
use sensorfleet_core::constants::{DEFAULT_CYCLES, DEFAULT_INTERVAL_SECS};
use sensorfleet_core::{SensorInstance, SensorKind};

use crate::error::RuntimeError;
use crate::scheduler::SensorUnit;

/// Root of the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    /// Cycles each sensor runs before stopping
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    /// Fleet seed; sensors without their own seed derive one from it
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub sink: SinkConfig,
    pub sensors: Vec<SensorConfig>,
}

/// HTTP sink settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

impl SinkConfig {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(&self.base_url)
            .timeout_secs(self.timeout_secs)
            .max_retries(self.max_retries)
    }

    /// HTTP sink for these settings
    pub fn http_sink(&self) -> Result<HttpSink, RuntimeError> {
        Ok(HttpSink::new(self.http_config())?)
    }
}

/// One sensor entry
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    /// Label for logs and reports; defaults to `<kind>-<index>`
    #[serde(default)]
    pub name: Option<String>,
    /// Device credential for the telemetry backend
    pub token: String,
    #[serde(default = "default_interval")]
    pub interval_secs: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub kind: SensorKind,
}

fn default_cycles() -> u32 {
    DEFAULT_CYCLES
}

fn default_interval() -> f64 {
    DEFAULT_INTERVAL_SECS as f64
}

impl FleetConfig {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ReadConfig {
            path: path.to_owned(),
            source,
        })?;

        let config = Self::parse(&text)?;
        info!(
            "Loaded {} sensor(s) from {}",
            config.sensors.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate config text
    pub fn parse(text: &str) -> Result<Self, RuntimeError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every fleet and sensor setting
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.sensors.is_empty() {
            return Err(RuntimeError::Invalid("no sensors configured".into()));
        }
        if self.sink.timeout_secs == 0 {
            return Err(RuntimeError::Invalid("sink.timeout_secs must be positive".into()));
        }

        let mut names = HashSet::new();
        for (index, sensor) in self.sensors.iter().enumerate() {
            let name = sensor.display_name(index);
            if !names.insert(name.clone()) {
                return Err(RuntimeError::Invalid(format!("duplicate sensor name `{name}`")));
            }
            sensor.validate(&name)?;
        }
        Ok(())
    }

    /// Build one unit per sensor entry
    ///
    /// `cycles` overrides the file's cycle count when given.
    pub fn build_units(&self, cycles: Option<u32>) -> Result<Vec<SensorUnit>, RuntimeError> {
        self.validate()?;

        let cycles = cycles.unwrap_or(self.cycles);
        let mut fleet_rng = self.seed.map(StdRng::seed_from_u64);

        self.sensors
            .iter()
            .enumerate()
            .map(|(index, sensor)| {
                let name = sensor.display_name(index);
                // Drawn for every sensor so adding a seed to one entry leaves the others alone
                let derived = fleet_rng.as_mut().map(|rng| rng.gen::<u64>());

                let mut builder = SensorInstance::builder(&sensor.token, sensor.kind.clone());
                if let Some(seed) = sensor.seed.or(derived) {
                    builder = builder.seed(seed);
                }
                let instance = builder
                    .build()
                    .map_err(|e| RuntimeError::sensor(&name, e))?;

                Ok(SensorUnit::new(name, instance, sensor.interval(), cycles))
            })
            .collect()
    }
}

impl SensorConfig {
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}-{index}", self.kind.tag()))
    }

    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs).unwrap_or(Duration::MAX)
    }

    fn validate(&self, name: &str) -> Result<(), RuntimeError> {
        if self.interval_secs <= 0.0 || Duration::try_from_secs_f64(self.interval_secs).is_err() {
            return Err(RuntimeError::Invalid(format!(
                "sensor `{name}`: interval_secs must be positive, got {}",
                self.interval_secs
            )));
        }
        // Same checks the builder runs, without consuming entropy
        SensorInstance::builder(&self.token, self.kind.clone())
            .seed(0)
            .build()
            .map(|_| ())
            .map_err(|e| RuntimeError::sensor(name, e))
    }
}
