//! Simulated Sensor Kinds
//!
//! ## Overview
//!
//! Each numeric kind is a bounded random walk. One generation step:
//!
//! ```text
//! candidate = current + step + outlier
//!                        │       └─ offset with probability chance/denominator, else 0
//!                        └─ kind's perturbation range
//! ```
//!
//! The candidate is then judged by the kind's outlier policy. Accepted values
//! become the new state; rejected ones leave it alone unless the kind has a
//! recovery rule.
//!
//! ## Kinds
//!
//! | Kind | Step | Valid | Recovery |
//! |---|---|---|---|
//! | Thermometer | uniform(0, 1) | ≤ limit, Δ ≤ elapsed s | none |
//! | Water level | randint(-5, 5) | 0..=max, Δ ≤ max | 50 / 0 |
//! | Humidity | uniform(-2, 2) | 0..=100 | uniform(10, 90) |
//! | Luminosity | uniform(-2, 2) | 0..=100 000 | uniform(10, 99 990) |
//! | Sound | uniform(-2, 2) | 0..=90 | uniform(10, 80) |
//! | Pressure | uniform(-2, 2) | 0..=50 | uniform(10, 40) |
//!
//! Motion is not a walk: it is a time-gated coin flip with no state.
//!
//! ## Usage Example
//!
//! ```rust
//! use sensorfleet_core::sensors::ThermometerParams;
//! use sensorfleet_core::traits::{OutlierPolicy, WalkState};
//! use chrono::NaiveDate;
//!
//! let params = ThermometerParams::default();
//! let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let state = WalkState { value: 20.0, measured_at: t0 };
//!
//! // Two degrees after ten seconds is plausible
//! let later = t0 + chrono::Duration::seconds(10);
//! assert!(params.validate(22.0, &state, &later).is_ok());
//!
//! // Anything above the limit never is
//! assert!(params.validate(51.0, &state, &later).is_err());
//! ```

mod humidity;
mod luminosity;
mod motion;
mod pressure;
mod ranged;
mod sound;
mod thermometer;
mod water_level;
/// Validation helpers shared by the kinds
pub mod utils;

pub use humidity::{Humidity, HumidityParams};
pub use luminosity::{Luminosity, LuminosityParams};
pub use motion::MotionParams;
pub use pressure::{Pressure, PressureParams};
pub use ranged::{RangeProfile, RangedParams};
pub use sound::{Sound, SoundParams};
pub use thermometer::{TemperatureScale, ThermometerParams};
pub use water_level::WaterLevelParams;
