//! Water level in a tank of fixed capacity
//!
//! The level moves in whole steps. Injected outliers add `max_level + 1`,
//! which always overflows the tank.
//!
//! Recovery branches, in the order they are checked:
//!
//! | Candidate | Verdict | New baseline |
//! |---|---|---|
//! | `< 0` | `OutOfRange` | 50 (capped at `max_level`) |
//! | `> max_level` | `OutOfRange` | 0 |
//! | `\|Δ\| > max_level`, in range | `RateExceeded` | none |
//!
//! The last branch cannot be reached from a state that is itself in range;
//! it guards instances seeded with an out-of-range starting level.

use rand::RngCore;
use serde::Deserialize;

use crate::{
    constants::sensors::{
        DEFAULT_OUTLIER_CHANCE, WATER_MAX_LEVEL, WATER_OUTLIER_DENOMINATOR, WATER_RESET_ABOVE_MAX,
        WATER_RESET_BELOW_ZERO, WATER_STEP,
    },
    errors::{ConfigError, ValidationError, ValidationResult},
    kind::KindTag,
    time::{elapsed_secs, Timestamp},
    traits::{OutlierOdds, OutlierPolicy, RandomWalk, WalkState},
};

use super::utils;

/// Water level parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaterLevelParams {
    /// Variable name on records
    pub variable: String,
    /// Unit symbol on records
    pub unit: String,
    /// Outlier chance out of 100
    pub outlier_chance: u32,
    /// Tank capacity
    pub max_level: u32,
}

impl Default for WaterLevelParams {
    fn default() -> Self {
        Self {
            variable: "water_level".into(),
            unit: "L".into(),
            outlier_chance: DEFAULT_OUTLIER_CHANCE,
            max_level: WATER_MAX_LEVEL,
        }
    }
}

impl WaterLevelParams {
    fn max(&self) -> f64 {
        f64::from(self.max_level)
    }
}

impl OutlierPolicy for WaterLevelParams {
    fn validate(&self, candidate: f64, state: &WalkState, now: &Timestamp) -> ValidationResult<()> {
        utils::check_finite(candidate)?;
        utils::check_range(candidate, 0.0, self.max())?;

        let delta = (candidate - state.value).abs();
        if delta > self.max() {
            return Err(ValidationError::RateExceeded {
                delta,
                limit: self.max(),
                elapsed_secs: elapsed_secs(&state.measured_at, now),
            });
        }

        Ok(())
    }

    fn reset_value(&self, reason: &ValidationError, _rng: &mut dyn RngCore) -> Option<f64> {
        match *reason {
            ValidationError::OutOfRange { value, .. } if value < 0.0 => {
                Some(WATER_RESET_BELOW_ZERO.min(self.max()))
            }
            ValidationError::OutOfRange { .. } => Some(WATER_RESET_ABOVE_MAX),
            _ => None,
        }
    }
}

impl RandomWalk for WaterLevelParams {
    fn tag(&self) -> KindTag {
        KindTag::WaterLevel
    }

    fn variable(&self) -> &str {
        &self.variable
    }

    fn unit(&self) -> Option<&str> {
        Some(&self.unit)
    }

    fn initial_value(&self, rng: &mut dyn RngCore) -> f64 {
        let max = i32::try_from(self.max_level).unwrap_or(i32::MAX);
        utils::uniform_int(rng, (0, max))
    }

    fn step(&self, rng: &mut dyn RngCore) -> f64 {
        utils::uniform_int(rng, WATER_STEP)
    }

    fn outlier_odds(&self) -> OutlierOdds {
        OutlierOdds {
            chance: self.outlier_chance,
            denominator: WATER_OUTLIER_DENOMINATOR,
            offset: self.max() + 1.0,
        }
    }

    fn check_params(&self) -> Result<(), ConfigError> {
        utils::check_variable(&self.variable)?;
        utils::check_chance("outlier_chance", self.outlier_chance, WATER_OUTLIER_DENOMINATOR)?;
        if self.max_level == 0 {
            return Err(ConfigError::parameter("max_level", "must be positive"));
        }
        Ok(())
    }
}
