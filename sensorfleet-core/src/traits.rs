//! Core traits for simulated sensors
//!
//! Every numeric kind is a bounded random walk judged by an outlier policy.
//! These traits are object safe so `SensorKind` can hand out a single
//! `&dyn RandomWalk` regardless of the variant.

use rand::{Rng, RngCore};

use crate::errors::{ConfigError, ValidationError, ValidationResult};
use crate::kind::KindTag;
use crate::time::Timestamp;

/// Mutable state of a walk-based sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkState {
    /// Last accepted (or reset) value
    pub value: f64,
    /// When `value` was measured
    pub measured_at: Timestamp,
}

/// Odds and size of the injected outlier term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierOdds {
    /// Numerator of the injection probability
    pub chance: u32,
    /// Denominator of the injection probability
    pub denominator: u32,
    /// Added to the candidate when injected
    pub offset: f64,
}

impl OutlierOdds {
    /// Draw the outlier term: `offset` with probability `chance / denominator`, else 0
    ///
    /// The draw is uniform over `1..=denominator`, so a chance of 0 never
    /// injects and a chance equal to the denominator always does.
    pub fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        if rng.gen_range(1..=self.denominator) <= self.chance {
            self.offset
        } else {
            0.0
        }
    }

    /// Injection probability in `[0, 1]`
    pub fn probability(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            f64::from(self.chance.min(self.denominator)) / f64::from(self.denominator)
        }
    }
}

/// Decides whether a candidate reading is an outlier
///
/// `validate` must not draw randomness; only `reset_value` may, and only to
/// pick a fresh baseline after a rejection.
pub trait OutlierPolicy {
    /// Judge a candidate against the current state
    fn validate(&self, candidate: f64, state: &WalkState, now: &Timestamp) -> ValidationResult<()>;

    /// Baseline to install after `reason` rejected a candidate, if the kind recovers
    fn reset_value(&self, _reason: &ValidationError, _rng: &mut dyn RngCore) -> Option<f64> {
        None
    }
}

/// Random-walk behaviour of a numeric sensor kind
pub trait RandomWalk: OutlierPolicy {
    /// Kind discriminant, for logs and rejections
    fn tag(&self) -> KindTag;

    /// Variable name on the telemetry backend
    fn variable(&self) -> &str;

    /// Unit attached to records, if any
    fn unit(&self) -> Option<&str>;

    /// Randomised starting value
    fn initial_value(&self, rng: &mut dyn RngCore) -> f64;

    /// Bounded perturbation for one step
    fn step(&self, rng: &mut dyn RngCore) -> f64;

    /// Outlier injection odds
    fn outlier_odds(&self) -> OutlierOdds;

    /// Check the configured parameters
    fn check_params(&self) -> Result<(), ConfigError>;
}
