//! Range-bounded walks with randomised recovery
//!
//! Humidity, luminosity, sound and pressure share one behaviour and differ
//! only in constants:
//! - step: uniform(-2, 2)
//! - outlier: +100 with probability `chance / denominator`
//! - valid: `min ≤ candidate ≤ max`
//! - recovery: a fresh baseline drawn uniformly from the kind's reset range
//!
//! The constants live on a zero-sized [`RangeProfile`] marker so each kind
//! keeps its own parameter type (and its own serde defaults) without
//! duplicating the walk.

use std::fmt;
use std::marker::PhantomData;

use rand::RngCore;
use serde::Deserialize;

use crate::{
    constants::sensors::{DEFAULT_OUTLIER_CHANCE, OUTLIER_OFFSET, SYMMETRIC_STEP},
    errors::{ConfigError, ValidationError, ValidationResult},
    kind::KindTag,
    time::Timestamp,
    traits::{OutlierOdds, OutlierPolicy, RandomWalk, WalkState},
};

use super::utils;

/// Per-kind constants for a range-bounded walk
pub trait RangeProfile: fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    /// Kind these constants belong to
    const TAG: KindTag;
    /// Default variable name
    const VARIABLE: &'static str;
    /// Default unit symbol
    const UNIT: Option<&'static str>;
    /// Outlier chance is drawn out of this
    const OUTLIER_DENOMINATOR: u32;
    /// Default valid range, inclusive
    const RANGE: (f64, f64);
    /// Range a recovery baseline is drawn from
    const RESET: (f64, f64);
    /// Range the starting value is drawn from
    const INITIAL: (f64, f64);
}

/// Parameters of a range-bounded walk
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, bound = "")]
pub struct RangedParams<P: RangeProfile> {
    /// Variable name on records
    pub variable: String,
    /// Unit symbol, if the kind has one
    pub unit: Option<String>,
    /// Outlier chance out of the profile's denominator
    pub outlier_chance: u32,
    /// Lowest valid value
    pub min: f64,
    /// Highest valid value
    pub max: f64,
    #[serde(skip)]
    profile: PhantomData<P>,
}

impl<P: RangeProfile> Default for RangedParams<P> {
    fn default() -> Self {
        Self {
            variable: P::VARIABLE.into(),
            unit: P::UNIT.map(str::to_owned),
            outlier_chance: DEFAULT_OUTLIER_CHANCE,
            min: P::RANGE.0,
            max: P::RANGE.1,
            profile: PhantomData,
        }
    }
}

impl<P: RangeProfile> RangedParams<P> {
    /// Replace the outlier chance
    pub fn with_outlier_chance(mut self, chance: u32) -> Self {
        self.outlier_chance = chance;
        self
    }

    /// Replace the valid range
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl<P: RangeProfile> OutlierPolicy for RangedParams<P> {
    fn validate(&self, candidate: f64, _state: &WalkState, _now: &Timestamp) -> ValidationResult<()> {
        utils::check_finite(candidate)?;
        utils::check_range(candidate, self.min, self.max)
    }

    fn reset_value(&self, reason: &ValidationError, rng: &mut dyn RngCore) -> Option<f64> {
        match reason {
            ValidationError::OutOfRange { .. } => Some(utils::uniform(rng, P::RESET)),
            _ => None,
        }
    }
}

impl<P: RangeProfile> RandomWalk for RangedParams<P> {
    fn tag(&self) -> KindTag {
        P::TAG
    }

    fn variable(&self) -> &str {
        &self.variable
    }

    fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn initial_value(&self, rng: &mut dyn RngCore) -> f64 {
        utils::uniform(rng, P::INITIAL)
    }

    fn step(&self, rng: &mut dyn RngCore) -> f64 {
        utils::uniform(rng, SYMMETRIC_STEP)
    }

    fn outlier_odds(&self) -> OutlierOdds {
        OutlierOdds {
            chance: self.outlier_chance,
            denominator: P::OUTLIER_DENOMINATOR,
            offset: OUTLIER_OFFSET,
        }
    }

    fn check_params(&self) -> Result<(), ConfigError> {
        utils::check_variable(&self.variable)?;
        utils::check_chance("outlier_chance", self.outlier_chance, P::OUTLIER_DENOMINATOR)?;
        utils::check_bounds(self.min, self.max)
    }
}
