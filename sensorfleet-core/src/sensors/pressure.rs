//! Line pressure, 0-50 psi

use crate::constants::sensors::{
    PRESSURE_INITIAL, PRESSURE_OUTLIER_DENOMINATOR, PRESSURE_RANGE, PRESSURE_RESET,
};
use crate::kind::KindTag;

use super::ranged::{RangeProfile, RangedParams};

/// Pressure profile marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pressure;

impl RangeProfile for Pressure {
    const TAG: KindTag = KindTag::Pressure;
    const VARIABLE: &'static str = "pressure";
    const UNIT: Option<&'static str> = Some("psi");
    const OUTLIER_DENOMINATOR: u32 = PRESSURE_OUTLIER_DENOMINATOR;
    const RANGE: (f64, f64) = PRESSURE_RANGE;
    const RESET: (f64, f64) = PRESSURE_RESET;
    const INITIAL: (f64, f64) = PRESSURE_INITIAL;
}

/// Pressure parameters
pub type PressureParams = RangedParams<Pressure>;
