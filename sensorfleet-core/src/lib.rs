//! Core simulation engine for SensorFleet
//!
//! Synthetic environmental sensors that produce readings by a bounded random
//! walk, inject occasional outliers, and reject them with per-kind policies.
//!
//! Key properties:
//! - Every sensor owns its state, random source and clock
//! - Seeded sensors are fully reproducible
//! - Rejections are values, never panics
//!
//! ```no_run
//! use sensorfleet_core::{SensorInstance, SensorKind};
//!
//! let mut thermometer = SensorInstance::builder("device-token", SensorKind::thermometer())
//!     .build()
//!     .unwrap();
//!
//! // Generate a reading
//! match thermometer.generate() {
//!     Ok(Some(record)) => {}, // Good to send
//!     Ok(None) => {},         // Nothing to report
//!     Err(e) => {},           // Outlier, skip this cycle
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod instance;
pub mod kind;
pub mod record;
pub mod sensors;
pub mod time;
pub mod traits;

// Public API
pub use errors::{ConfigError, MeasurementRejected, ValidationError, ValidationResult};
pub use instance::{SensorInstance, SensorInstanceBuilder};
pub use kind::{KindTag, SensorKind};
pub use record::{Record, RecordValue};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use traits::{OutlierOdds, OutlierPolicy, RandomWalk, WalkState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
