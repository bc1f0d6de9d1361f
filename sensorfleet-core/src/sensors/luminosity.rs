//! Illuminance, 0-100 000 lux
//!
//! Outliers are drawn out of 100 000, so injections are very rare, and the
//! +100 offset alone rarely leaves the range.

use crate::constants::sensors::{
    LUMINOSITY_INITIAL, LUMINOSITY_OUTLIER_DENOMINATOR, LUMINOSITY_RANGE, LUMINOSITY_RESET,
};
use crate::kind::KindTag;

use super::ranged::{RangeProfile, RangedParams};

/// Luminosity profile marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Luminosity;

impl RangeProfile for Luminosity {
    const TAG: KindTag = KindTag::Luminosity;
    const VARIABLE: &'static str = "luminosity";
    const UNIT: Option<&'static str> = None;
    const OUTLIER_DENOMINATOR: u32 = LUMINOSITY_OUTLIER_DENOMINATOR;
    const RANGE: (f64, f64) = LUMINOSITY_RANGE;
    const RESET: (f64, f64) = LUMINOSITY_RESET;
    const INITIAL: (f64, f64) = LUMINOSITY_INITIAL;
}

/// Luminosity parameters
pub type LuminosityParams = RangedParams<Luminosity>;
