//! Relative humidity, 0-100 %
//!
//! No unit is attached to records; the backend treats the value as a
//! percentage.

use crate::constants::sensors::{
    HUMIDITY_INITIAL, HUMIDITY_OUTLIER_DENOMINATOR, HUMIDITY_RANGE, HUMIDITY_RESET,
};
use crate::kind::KindTag;

use super::ranged::{RangeProfile, RangedParams};

/// Humidity profile marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Humidity;

impl RangeProfile for Humidity {
    const TAG: KindTag = KindTag::Humidity;
    const VARIABLE: &'static str = "humidity";
    const UNIT: Option<&'static str> = None;
    const OUTLIER_DENOMINATOR: u32 = HUMIDITY_OUTLIER_DENOMINATOR;
    const RANGE: (f64, f64) = HUMIDITY_RANGE;
    const RESET: (f64, f64) = HUMIDITY_RESET;
    const INITIAL: (f64, f64) = HUMIDITY_INITIAL;
}

/// Humidity parameters
pub type HumidityParams = RangedParams<Humidity>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::traits::{OutlierPolicy, RandomWalk, WalkState};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn saturation_bounds() {
        let params = HumidityParams::default();
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let state = WalkState { value: 50.0, measured_at: now };

        assert!(params.validate(0.0, &state, &now).is_ok());
        assert!(params.validate(100.0, &state, &now).is_ok());
        assert!(params.validate(100.5, &state, &now).is_err());
        assert!(params.validate(-0.5, &state, &now).is_err());
    }

    #[test]
    fn recovery_draws_from_reset_range() {
        let params = HumidityParams::default();
        let mut rng = StdRng::seed_from_u64(21);
        let reason = ValidationError::OutOfRange { value: 150.0, min: 0.0, max: 100.0 };

        for _ in 0..100 {
            let reset = params.reset_value(&reason, &mut rng).unwrap();
            assert!((10.0..90.0).contains(&reset));
        }
        assert_eq!(params.unit(), None);
        assert_eq!(params.variable(), "humidity");
    }
}
