//! Scheduling Defaults
//!
//! Values used when a fleet configuration leaves cadence unspecified.

/// Default pause between two measurements of one sensor (seconds).
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Default number of sleep-measure-send cycles per sensor.
pub const DEFAULT_CYCLES: u32 = 100;

/// Minutes in a day; motion windows must be shorter.
pub const MINUTES_PER_DAY: u32 = 24 * 60;
