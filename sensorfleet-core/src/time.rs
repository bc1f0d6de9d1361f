//! Time management for simulated sensors
//!
//! Provides a clock abstraction so the generation step never reads the wall
//! clock directly:
//! - System clock (local time, used in production)
//! - Manual clock (shared, settable, used by tests and replays)
//!
//! Timestamps are naive local date-times; the wire format is
//! `"YYYY-MM-DD, HH:MM:SS"`.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};

/// Local wall-clock timestamp
pub type Timestamp = NaiveDateTime;

/// Format used in every emitted record's `time` field
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";

/// Source of time for a sensor
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current local time
    fn now(&self) -> Timestamp;
}

/// Local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().naive_local()
    }
}

/// Settable clock for testing
///
/// Clones share the same instant, so a test can keep one handle and move time
/// under a sensor that owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Clock stopped at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        *self.lock() = timestamp;
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    /// Advance by fractional seconds (millisecond resolution)
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::milliseconds((secs * 1000.0).round() as i64));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        // A poisoned clock still holds a valid instant.
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }
}

/// Render a timestamp in the record wire format
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format(RECORD_TIME_FORMAT).to_string()
}

/// Seconds elapsed from `earlier` to `later`, with sub-second resolution
///
/// Negative when the clock moved backwards.
pub fn elapsed_secs(earlier: &Timestamp, later: &Timestamp) -> f64 {
    let delta = *later - *earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn record_format_is_exact() {
        assert_eq!(format_timestamp(&at(7, 5, 3)), "2024-03-09, 07:05:03");
    }

    #[test]
    fn manual_clock_advances_shared_instant() {
        let clock = ManualClock::new(at(12, 0, 0));
        let handle = clock.clone();

        handle.advance_secs(1.5);
        assert_eq!(elapsed_secs(&at(12, 0, 0), &clock.now()), 1.5);

        handle.set(at(13, 0, 0));
        assert_eq!(clock.now(), at(13, 0, 0));
    }

    #[test]
    fn elapsed_resolves_milliseconds() {
        let start = at(12, 0, 0);
        let later = start + Duration::milliseconds(1);
        assert_eq!(elapsed_secs(&start, &later), 0.001);
        assert_eq!(elapsed_secs(&later, &start), -0.001);
    }
}
