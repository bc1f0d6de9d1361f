//! Stateless motion detector gated by a daily alert window
//!
//! Each step draws `randint(0, 100)`. Motion is reported only when the draw is
//! at most the configured chance **and** the local time falls inside
//! `[window_start, window_start + window_minutes)` on the current date.
//! Anything else is "no event", which is a normal outcome rather than a
//! rejection.
//!
//! The draw includes 0, so detection inside the window has probability
//! `(chance + 1) / 101`; even a chance of 0 fires about once in 101 steps.
//!
//! The window is anchored to today's date, so a window that runs past
//! midnight only covers the part before midnight.

use chrono::{Duration, NaiveTime};
use rand::{Rng, RngCore};
use serde::Deserialize;

use crate::{
    constants::{
        sensors::{
            MOTION_CHANCE_DENOMINATOR, MOTION_DEFAULT_CHANCE, MOTION_LABEL, MOTION_WINDOW_MINUTES,
            MOTION_WINDOW_START,
        },
        time::MINUTES_PER_DAY,
    },
    errors::ConfigError,
    record::Record,
    time::Timestamp,
};

use super::utils;

/// Motion sensor parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Variable name on the telemetry backend
    pub variable: String,
    /// Value sent when motion is detected
    pub label: String,
    /// Highest draw (of `0..=100`) that counts as motion
    pub chance: u32,
    /// Start of the alert window, local time
    pub window_start: NaiveTime,
    /// Window length
    pub window_minutes: u32,
}

impl Default for MotionParams {
    fn default() -> Self {
        let (hour, minute) = MOTION_WINDOW_START;
        Self {
            variable: "motion".into(),
            label: MOTION_LABEL.into(),
            chance: MOTION_DEFAULT_CHANCE,
            window_start: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
            window_minutes: MOTION_WINDOW_MINUTES,
        }
    }
}

impl MotionParams {
    /// Whether `now` falls inside today's alert window
    pub fn in_window(&self, now: &Timestamp) -> bool {
        let start = now.date().and_time(self.window_start);
        let end = start + Duration::minutes(i64::from(self.window_minutes));
        *now >= start && *now < end
    }

    /// Run one detection step
    pub fn detect(&self, rng: &mut dyn RngCore, now: &Timestamp) -> Option<Record> {
        let draw = rng.gen_range(0..=MOTION_CHANCE_DENOMINATOR);
        if draw <= self.chance && self.in_window(now) {
            Some(Record::event(&self.variable, &self.label, now))
        } else {
            None
        }
    }

    /// Validate chance, label and window length
    pub fn check_params(&self) -> Result<(), ConfigError> {
        utils::check_variable(&self.variable)?;
        utils::check_chance("chance", self.chance, MOTION_CHANCE_DENOMINATOR)?;
        if self.label.is_empty() {
            return Err(ConfigError::parameter("label", "must not be empty"));
        }
        if self.window_minutes == 0 || self.window_minutes >= MINUTES_PER_DAY {
            return Err(ConfigError::parameter(
                "window_minutes",
                format!("must be between 1 and {}", MINUTES_PER_DAY - 1),
            ));
        }
        Ok(())
    }
}
