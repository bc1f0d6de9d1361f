//! Sensor state machine
//!
//! A [`SensorInstance`] owns everything one simulated sensor needs: its
//! credential, kind parameters, walk state, random source and clock. It is
//! single-owner; nothing else mutates it.
//!
//! ```rust
//! use sensorfleet_core::{SensorInstance, SensorKind};
//!
//! let mut sensor = SensorInstance::builder("5f0c-token", SensorKind::humidity())
//!     .seed(42)
//!     .build()?;
//!
//! for _ in 0..10 {
//!     match sensor.generate() {
//!         Ok(Some(record)) => println!("{record}"),
//!         Ok(None) => {}
//!         Err(rejected) => println!("{rejected}"),
//!     }
//! }
//! # Ok::<(), sensorfleet_core::ConfigError>(())
//! ```

use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::errors::{ConfigError, MeasurementRejected};
use crate::kind::{KindTag, SensorKind};
use crate::record::Record;
use crate::time::{Clock, SystemClock, Timestamp};
use crate::traits::{RandomWalk, WalkState};

/// One simulated sensor
#[derive(Debug)]
pub struct SensorInstance {
    token: String,
    kind: SensorKind,
    /// `None` for stateless kinds
    state: Option<WalkState>,
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl SensorInstance {
    /// Start configuring an instance for `token`
    pub fn builder(token: impl Into<String>, kind: SensorKind) -> SensorInstanceBuilder {
        SensorInstanceBuilder {
            token: token.into(),
            kind,
            seed: None,
            clock: None,
            initial_value: None,
        }
    }

    /// Credential identifying the destination stream
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Kind and its parameters
    pub fn kind(&self) -> &SensorKind {
        &self.kind
    }

    /// Kind discriminant
    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Last accepted value; `None` for stateless kinds
    pub fn current_value(&self) -> Option<f64> {
        self.state.map(|s| s.value)
    }

    /// When the current value was measured
    pub fn last_measurement_time(&self) -> Option<Timestamp> {
        self.state.map(|s| s.measured_at)
    }

    /// Produce the next reading
    ///
    /// Walk kinds return `Ok(Some(record))` or a rejection; motion returns
    /// `Ok(Some(record))` or `Ok(None)` and never fails.
    pub fn generate(&mut self) -> Result<Option<Record>, MeasurementRejected> {
        let now = self.clock.now();
        let rng: &mut dyn RngCore = &mut self.rng;

        let (walk, state) = match (&self.kind, self.state.as_mut()) {
            (SensorKind::Motion(params), _) => {
                let record = params.detect(rng, &now);
                if record.is_none() {
                    trace!("{}: no motion", self.token);
                }
                return Ok(record);
            }
            (kind, Some(state)) => match kind.walk() {
                Some(walk) => (walk, state),
                None => return Ok(None),
            },
            (_, None) => return Ok(None),
        };

        let candidate = state.value + walk.step(rng) + walk.outlier_odds().draw(rng);
        apply(walk, state, candidate, now, rng).map(Some)
    }

    /// Judge a given candidate as if it had been drawn by [`generate`](Self::generate)
    ///
    /// Useful to replay readings or to exercise the policy with fixed values.
    /// Stateless kinds have nothing to judge and return `Ok(None)`.
    pub fn measure(&mut self, candidate: f64) -> Result<Option<Record>, MeasurementRejected> {
        let now = self.clock.now();
        let rng: &mut dyn RngCore = &mut self.rng;

        match (self.kind.walk(), self.state.as_mut()) {
            (Some(walk), Some(state)) => apply(walk, state, candidate, now, rng).map(Some),
            _ => Ok(None),
        }
    }
}

fn apply(
    walk: &dyn RandomWalk,
    state: &mut WalkState,
    candidate: f64,
    now: Timestamp,
    rng: &mut dyn RngCore,
) -> Result<Record, MeasurementRejected> {
    match walk.validate(candidate, state, &now) {
        Ok(()) => {
            state.value = candidate;
            state.measured_at = now;
            Ok(Record::numeric(walk.variable(), candidate, walk.unit(), &now))
        }
        Err(reason) => {
            let reset_to = walk.reset_value(&reason, rng);
            if let Some(baseline) = reset_to {
                debug!("{}: state reset from {:.2} to {:.2}", walk.tag(), state.value, baseline);
                state.value = baseline;
                state.measured_at = now;
            }
            Err(MeasurementRejected {
                kind: walk.tag(),
                candidate,
                reason,
                reset_to,
            })
        }
    }
}

/// Builder for [`SensorInstance`]
#[derive(Debug)]
pub struct SensorInstanceBuilder {
    token: String,
    kind: SensorKind,
    seed: Option<u64>,
    clock: Option<Arc<dyn Clock>>,
    initial_value: Option<f64>,
}

impl SensorInstanceBuilder {
    /// Seed the random source for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Time source; defaults to [`SystemClock`](crate::time::SystemClock)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Start from a fixed value instead of a random one
    pub fn initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Validate the parameters and seed the walk state
    pub fn build(self) -> Result<SensorInstance, ConfigError> {
        check_token(&self.token)?;
        self.kind.validate()?;

        if let Some(value) = self.initial_value {
            if !value.is_finite() {
                return Err(ConfigError::parameter("initial_value", "must be finite"));
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let measured_at = clock.now();

        let state = self.kind.walk().map(|walk| WalkState {
            value: self
                .initial_value
                .unwrap_or_else(|| walk.initial_value(&mut rng)),
            measured_at,
        });

        Ok(SensorInstance {
            token: self.token,
            kind: self.kind,
            state,
            rng,
            clock,
        })
    }
}

fn check_token(token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::InvalidCredential("token is empty"));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidCredential("token contains whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::sensors::{HumidityParams, ThermometerParams, WaterLevelParams};
    use crate::time::ManualClock;
    use chrono::{Duration, NaiveDate};

    fn clock() -> ManualClock {
        ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn thermometer(clock: &ManualClock, chance: u32) -> SensorInstance {
        let kind = SensorKind::Thermometer(ThermometerParams {
            outlier_chance: chance,
            ..Default::default()
        });
        SensorInstance::builder("thermo-token", kind)
            .seed(7)
            .clock(Arc::new(clock.clone()))
            .initial_value(20.0)
            .build()
            .unwrap()
    }

    #[test]
    fn accepted_reading_updates_state_and_time() {
        let clock = clock();
        let mut sensor = thermometer(&clock, 0);
        let start = sensor.last_measurement_time().unwrap();

        clock.advance(Duration::seconds(10));
        let record = sensor.generate().unwrap().unwrap();

        let value = sensor.current_value().unwrap();
        assert!((20.0..21.0).contains(&value));
        assert_eq!(record.value.as_f64(), Some((value * 100.0).round() / 100.0));
        assert_eq!(record.unit.as_deref(), Some("C"));
        assert_eq!(record.time, "2024-03-09, 10:00:10");
        assert_eq!(sensor.last_measurement_time(), Some(start + Duration::seconds(10)));
    }

    #[test]
    fn rejected_readings_never_move_time_forward() {
        let clock = clock();
        let mut sensor = thermometer(&clock, 100);
        let start = sensor.last_measurement_time().unwrap();

        for _ in 0..20 {
            clock.advance(Duration::seconds(30));
            let err = sensor.generate().unwrap_err();
            assert_eq!(err.kind, KindTag::Thermometer);
            assert!(matches!(err.reason, ValidationError::OutOfRange { .. }));
            assert_eq!(err.reset_to, None);
        }

        assert_eq!(sensor.last_measurement_time(), Some(start));
        assert_eq!(sensor.current_value(), Some(20.0));
    }

    #[test]
    fn measure_applies_rate_rule() {
        let clock = clock();
        let mut sensor = thermometer(&clock, 0);

        clock.advance_secs(0.001);
        let err = sensor.measure(25.0).unwrap_err();
        assert!(matches!(err.reason, ValidationError::RateExceeded { .. }));

        clock.advance_secs(10.0);
        let record = sensor.measure(25.0).unwrap().unwrap();
        assert_eq!(record.value.as_f64(), Some(25.0));
        assert_eq!(sensor.current_value(), Some(25.0));
    }

    #[test]
    fn water_level_resets_are_applied() {
        let clock = clock();
        let mut sensor = SensorInstance::builder("tank", SensorKind::water_level())
            .clock(Arc::new(clock.clone()))
            .initial_value(3.0)
            .seed(1)
            .build()
            .unwrap();

        let err = sensor.measure(-1.0).unwrap_err();
        assert_eq!(err.reset_to, Some(50.0));
        assert_eq!(sensor.current_value(), Some(50.0));

        let err = sensor.measure(101.0).unwrap_err();
        assert_eq!(err.reset_to, Some(0.0));
        assert_eq!(sensor.current_value(), Some(0.0));
    }

    #[test]
    fn forced_outliers_reset_ranged_kinds_into_reset_range() {
        let kind = SensorKind::Humidity(HumidityParams::default().with_outlier_chance(100));
        let mut sensor = SensorInstance::builder("hum", kind)
            .seed(3)
            .initial_value(60.0)
            .build()
            .unwrap();

        for _ in 0..50 {
            let err = sensor.generate().unwrap_err();
            let reset = err.reset_to.expect("humidity recovers");
            assert!((10.0..90.0).contains(&reset));
            assert_eq!(sensor.current_value(), Some(reset));
        }
    }

    #[test]
    fn same_seed_same_readings() {
        let run = || {
            let mut sensor = SensorInstance::builder("p", SensorKind::pressure())
                .seed(99)
                .clock(Arc::new(clock()))
                .build()
                .unwrap();
            (0..25)
                .map(|_| sensor.generate().map(|r| r.map(|r| r.value)).ok())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn motion_has_no_state() {
        let sensor = SensorInstance::builder("m", SensorKind::motion())
            .seed(1)
            .build()
            .unwrap();
        assert_eq!(sensor.current_value(), None);
        assert_eq!(sensor.last_measurement_time(), None);
    }

    #[test]
    fn invalid_configuration_is_refused() {
        assert!(matches!(
            SensorInstance::builder("", SensorKind::sound()).build(),
            Err(ConfigError::InvalidCredential(_))
        ));
        assert!(SensorInstance::builder("a b", SensorKind::sound()).build().is_err());

        let kind = SensorKind::WaterLevel(WaterLevelParams {
            max_level: 0,
            ..Default::default()
        });
        assert!(matches!(
            SensorInstance::builder("ok", kind).build(),
            Err(ConfigError::InvalidParameter { name: "max_level", .. })
        ));
    }
}
