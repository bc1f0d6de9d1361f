//! Error Types for Simulated Measurements
//!
//! ## Error Categories
//!
//! Errors fall into three groups, each handled at a different level:
//!
//! ### Validation Verdicts
//! - `OutOfRange`: candidate falls outside the kind's valid range
//! - `RateExceeded`: candidate moved further than the elapsed time allows
//! - `InvalidValue`: candidate is NaN or infinite
//!
//! These are produced by an [`OutlierPolicy`](crate::traits::OutlierPolicy) and
//! never leave the core on their own; they are wrapped in a rejection.
//!
//! ### Rejections
//! - [`MeasurementRejected`]: returned by `SensorInstance::generate` when the
//!   candidate was classified as an outlier. Recovered locally by the caller:
//!   log it and move on to the next cycle.
//!
//! ### Configuration
//! - [`ConfigError`]: invalid credential or parameter ranges. Only ever raised
//!   while building a fleet, before any sensor starts running.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use sensorfleet_core::{SensorInstance, SensorKind, ValidationError};
//!
//! let mut sensor = SensorInstance::builder("token", SensorKind::pressure())
//!     .seed(3)
//!     .build()
//!     .unwrap();
//!
//! match sensor.generate() {
//!     Ok(Some(record)) => { /* queue for delivery */ let _ = record; }
//!     Ok(None) => { /* motion sensor saw nothing */ }
//!     Err(rejected) => match rejected.reason {
//!         ValidationError::OutOfRange { .. } => { /* state may have been reset */ }
//!         ValidationError::RateExceeded { .. } => { /* too fast for the clock */ }
//!         ValidationError::InvalidValue => {}
//!     },
//! }
//! ```

use thiserror::Error;

use crate::kind::KindTag;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Why a candidate value was classified as an outlier
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value outside the kind's valid range
    #[error("value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The candidate that failed validation
        value: f64,
        /// Lowest acceptable value
        min: f64,
        /// Highest acceptable value
        max: f64,
    },

    /// Value moved further than allowed for the time since the last measurement
    #[error("change of {delta} exceeds limit {limit} after {elapsed_secs}s")]
    RateExceeded {
        /// Absolute difference between candidate and current value
        delta: f64,
        /// Largest change the policy allows for this step
        limit: f64,
        /// Seconds since the last accepted measurement
        elapsed_secs: f64,
    },

    /// Value makes no numeric sense (NaN, infinity)
    #[error("invalid value: not a finite number")]
    InvalidValue,
}

/// A generation step whose candidate failed the kind's outlier policy
///
/// No record is emitted. When the kind has a recovery rule the instance state
/// has already been reset to `reset_to` by the time this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} measurement rejected (candidate {candidate:.2}): {reason}")]
pub struct MeasurementRejected {
    /// Kind of sensor that produced the candidate
    pub kind: KindTag,
    /// The rejected candidate value
    pub candidate: f64,
    /// Verdict from the outlier policy
    pub reason: ValidationError,
    /// New baseline installed by the recovery rule, if any
    pub reset_to: Option<f64>,
}

/// Invalid sensor configuration; fatal at startup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Credential missing or malformed
    #[error("invalid credential: {0}")]
    InvalidCredential(&'static str),

    /// A parameter is outside its accepted range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_mentions_kind_and_reason() {
        let err = MeasurementRejected {
            kind: KindTag::Thermometer,
            candidate: 120.456,
            reason: ValidationError::OutOfRange {
                value: 120.456,
                min: f64::NEG_INFINITY,
                max: 50.0,
            },
            reset_to: None,
        };

        let text = err.to_string();
        assert!(text.starts_with("thermometer measurement rejected"));
        assert!(text.contains("120.46"));
        assert!(text.contains("outside range"));
    }

    #[test]
    fn parameter_error_names_field() {
        let err = ConfigError::parameter("outlier_chance", "must not exceed 100");
        assert_eq!(
            err.to_string(),
            "invalid parameter `outlier_chance`: must not exceed 100"
        );
    }
}
