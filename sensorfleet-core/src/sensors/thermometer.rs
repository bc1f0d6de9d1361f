//! Thermometer with a ceiling and a wall-clock rate limit
//!
//! A candidate is an outlier when:
//! - it exceeds the configured limit (checked first, regardless of time), or
//! - it moved more degrees than seconds have passed since the last accepted
//!   measurement.
//!
//! The rate rule makes short scheduling intervals reject more often: after
//! 0.5 s only a change of at most 0.5 degrees is accepted. There is no
//! recovery rule; state is untouched by a rejection.

use rand::RngCore;
use serde::Deserialize;

use crate::{
    constants::sensors::{
        DEFAULT_OUTLIER_CHANCE, OUTLIER_OFFSET, THERMOMETER_INITIAL_C, THERMOMETER_INITIAL_F,
        THERMOMETER_LIMIT, THERMOMETER_OUTLIER_DENOMINATOR, THERMOMETER_STEP,
    },
    errors::{ConfigError, ValidationError, ValidationResult},
    kind::KindTag,
    time::{elapsed_secs, Timestamp},
    traits::{OutlierOdds, OutlierPolicy, RandomWalk, WalkState},
};

use super::utils;

/// Temperature scale, also used as the record unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TemperatureScale {
    /// Degrees Celsius
    #[default]
    #[serde(rename = "C", alias = "celsius")]
    Celsius,
    /// Degrees Fahrenheit
    #[serde(rename = "F", alias = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureScale {
    /// Unit symbol written to records
    pub const fn symbol(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
        }
    }

    /// Range the starting temperature is drawn from
    pub const fn initial_range(&self) -> (f64, f64) {
        match self {
            TemperatureScale::Celsius => THERMOMETER_INITIAL_C,
            TemperatureScale::Fahrenheit => THERMOMETER_INITIAL_F,
        }
    }
}

/// Thermometer parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThermometerParams {
    /// Variable name on records
    pub variable: String,
    /// Scale of the walk and the record unit
    pub scale: TemperatureScale,
    /// Outlier chance out of 100
    pub outlier_chance: u32,
    /// Temperatures above this are outliers
    pub limit: f64,
}

impl Default for ThermometerParams {
    fn default() -> Self {
        Self {
            variable: "temperature".into(),
            scale: TemperatureScale::Celsius,
            outlier_chance: DEFAULT_OUTLIER_CHANCE,
            limit: THERMOMETER_LIMIT,
        }
    }
}

impl OutlierPolicy for ThermometerParams {
    fn validate(&self, candidate: f64, state: &WalkState, now: &Timestamp) -> ValidationResult<()> {
        utils::check_finite(candidate)?;
        utils::check_range(candidate, f64::NEG_INFINITY, self.limit)?;

        let delta = (state.value - candidate).abs();
        let elapsed = elapsed_secs(&state.measured_at, now);
        if delta > elapsed {
            return Err(ValidationError::RateExceeded {
                delta,
                limit: elapsed,
                elapsed_secs: elapsed,
            });
        }

        Ok(())
    }
}

impl RandomWalk for ThermometerParams {
    fn tag(&self) -> KindTag {
        KindTag::Thermometer
    }

    fn variable(&self) -> &str {
        &self.variable
    }

    fn unit(&self) -> Option<&str> {
        Some(self.scale.symbol())
    }

    fn initial_value(&self, rng: &mut dyn RngCore) -> f64 {
        utils::uniform(rng, self.scale.initial_range())
    }

    fn step(&self, rng: &mut dyn RngCore) -> f64 {
        utils::uniform(rng, THERMOMETER_STEP)
    }

    fn outlier_odds(&self) -> OutlierOdds {
        OutlierOdds {
            chance: self.outlier_chance,
            denominator: THERMOMETER_OUTLIER_DENOMINATOR,
            offset: OUTLIER_OFFSET,
        }
    }

    fn check_params(&self) -> Result<(), ConfigError> {
        utils::check_variable(&self.variable)?;
        utils::check_chance("outlier_chance", self.outlier_chance, THERMOMETER_OUTLIER_DENOMINATOR)?;
        if !self.limit.is_finite() {
            return Err(ConfigError::parameter("limit", "must be finite"));
        }
        // Starting above the limit would reject every reading forever.
        let (_, initial_max) = self.scale.initial_range();
        if self.limit < initial_max {
            return Err(ConfigError::parameter(
                "limit",
                format!(
                    "{} is below the {} starting range (up to {initial_max})",
                    self.limit,
                    self.scale.symbol()
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn state_at(value: f64) -> (WalkState, Timestamp) {
        let t0 = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        (WalkState { value, measured_at: t0 }, t0)
    }

    #[test]
    fn ceiling_rejects_regardless_of_elapsed_time() {
        let params = ThermometerParams::default();
        let (state, t0) = state_at(20.0);

        for secs in [0, 10, 3600, 86_400] {
            let now = t0 + Duration::seconds(secs);
            assert!(matches!(
                params.validate(51.0, &state, &now),
                Err(ValidationError::OutOfRange { max, .. }) if max == 50.0
            ));
        }
    }

    #[test]
    fn rate_limited_by_elapsed_seconds() {
        let params = ThermometerParams::default();
        let (state, t0) = state_at(20.0);

        let soon = t0 + Duration::milliseconds(1);
        let result = params.validate(25.0, &state, &soon);
        assert!(matches!(
            result,
            Err(ValidationError::RateExceeded { delta, elapsed_secs, .. })
                if delta == 5.0 && elapsed_secs == 0.001
        ));

        let later = t0 + Duration::seconds(10);
        assert!(params.validate(25.0, &state, &later).is_ok());
    }

    #[test]
    fn change_equal_to_elapsed_is_accepted() {
        let params = ThermometerParams::default();
        let (state, t0) = state_at(20.0);
        let now = t0 + Duration::seconds(2);

        assert!(params.validate(22.0, &state, &now).is_ok());
        assert!(params.validate(18.0, &state, &now).is_ok());
    }

    #[test]
    fn no_recovery_rule() {
        let params = ThermometerParams::default();
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let reason = ValidationError::InvalidValue;
        assert_eq!(params.reset_value(&reason, &mut rng), None);
    }

    #[test]
    fn fahrenheit_needs_a_matching_limit() {
        let params = ThermometerParams {
            scale: TemperatureScale::Fahrenheit,
            ..Default::default()
        };
        assert!(params.check_params().is_err());

        let params = ThermometerParams {
            scale: TemperatureScale::Fahrenheit,
            limit: 122.0,
            ..Default::default()
        };
        assert!(params.check_params().is_ok());
        assert_eq!(params.unit(), Some("F"));
    }

    #[test]
    fn scale_deserializes_from_symbol() {
        let params: ThermometerParams =
            serde_json::from_str(r#"{"scale": "F", "limit": 120}"#).unwrap();
        assert_eq!(params.scale, TemperatureScale::Fahrenheit);
        assert_eq!(params.limit, 120.0);
        assert_eq!(params.outlier_chance, 5);
    }
}
