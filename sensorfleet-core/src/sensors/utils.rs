//! Shared helpers for sensor kinds
//!
//! Pure range checks plus the two random draws every kind needs.

use rand::{Rng, RngCore};

use crate::errors::{ConfigError, ValidationError, ValidationResult};

/// Reject NaN and infinities
pub fn check_finite(value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue)
    }
}

/// Check that a value lies within `[min, max]`
pub fn check_range(value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if value < min || value > max {
        Err(ValidationError::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}

/// Uniform draw from `[lo, hi)`; degenerate ranges yield `lo`
pub fn uniform(rng: &mut dyn RngCore, (lo, hi): (f64, f64)) -> f64 {
    if lo < hi {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Uniform integer draw from `[lo, hi]`, as a float
pub fn uniform_int(rng: &mut dyn RngCore, (lo, hi): (i32, i32)) -> f64 {
    if lo < hi {
        f64::from(rng.gen_range(lo..=hi))
    } else {
        f64::from(lo)
    }
}

/// Outlier chance must be a valid numerator for its denominator
pub fn check_chance(name: &'static str, chance: u32, denominator: u32) -> Result<(), ConfigError> {
    if chance > denominator {
        return Err(ConfigError::parameter(
            name,
            format!("{chance} exceeds denominator {denominator}"),
        ));
    }
    Ok(())
}

/// Bounds must be finite and ordered
pub fn check_bounds(min: f64, max: f64) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::parameter("min/max", "bounds must be finite"));
    }
    if min >= max {
        return Err(ConfigError::parameter(
            "min/max",
            format!("min {min} must be below max {max}"),
        ));
    }
    Ok(())
}

/// Variable names must be non-empty
pub fn check_variable(variable: &str) -> Result<(), ConfigError> {
    if variable.trim().is_empty() {
        return Err(ConfigError::parameter("variable", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn range_check() {
        assert!(check_range(5.0, 0.0, 10.0).is_ok());
        assert!(check_range(0.0, 0.0, 10.0).is_ok());
        assert!(check_range(-0.01, 0.0, 10.0).is_err());
        assert!(check_range(10.01, 0.0, 10.0).is_err());
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(check_finite(f64::NAN), Err(ValidationError::InvalidValue));
        assert_eq!(check_finite(f64::INFINITY), Err(ValidationError::InvalidValue));
        assert!(check_finite(3.0).is_ok());
    }

    #[test]
    fn draws_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let x = uniform(&mut rng, (-2.0, 2.0));
            assert!((-2.0..2.0).contains(&x));

            let n = uniform_int(&mut rng, (-5, 5));
            assert!((-5.0..=5.0).contains(&n));
            assert_eq!(n.fract(), 0.0);
        }
        assert_eq!(uniform(&mut rng, (3.0, 3.0)), 3.0);
    }

    #[test]
    fn parameter_checks() {
        assert!(check_chance("outlier_chance", 5, 100).is_ok());
        assert!(check_chance("outlier_chance", 101, 100).is_err());
        assert!(check_bounds(0.0, 1.0).is_ok());
        assert!(check_bounds(1.0, 1.0).is_err());
        assert!(check_bounds(f64::NAN, 1.0).is_err());
        assert!(check_variable(" ").is_err());
    }
}
