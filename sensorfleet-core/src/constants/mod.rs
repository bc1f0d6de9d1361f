//! Constants for SensorFleet Core
//!
//! Centralised defaults for every simulated sensor kind and for scheduling.
//! Per-instance configuration overrides most of these; the tables here are
//! what a sensor gets when a field is left out.
//!
//! ## Organization
//!
//! - **Sensors**: walk steps, valid ranges, outlier odds and reset baselines
//! - **Time**: scheduling cadence defaults

/// Per-kind walk, range and outlier parameters.
pub mod sensors;

/// Scheduling defaults.
pub mod time;

pub use sensors::{DEFAULT_OUTLIER_CHANCE, OUTLIER_OFFSET, RECORD_DECIMALS};
pub use time::{DEFAULT_CYCLES, DEFAULT_INTERVAL_SECS};
