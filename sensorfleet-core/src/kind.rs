//! Sensor kind enumeration
//!
//! `SensorKind` is a tagged variant holding each kind's parameters. It
//! deserializes from an internally tagged map, so a configuration entry reads
//! naturally:
//!
//! ```json
//! {"kind": "water_level", "max_level": 200, "outlier_chance": 2}
//! ```
//!
//! Fields left out fall back to the kind's defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::sensors::{
    HumidityParams, LuminosityParams, MotionParams, PressureParams, SoundParams,
    ThermometerParams, WaterLevelParams,
};
use crate::traits::RandomWalk;

/// Plain discriminant of a sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    /// Temperature walk in a chosen scale
    Thermometer,
    /// Tank level bounded by its capacity
    WaterLevel,
    /// Relative humidity in percent
    Humidity,
    /// Illuminance, unitless on records
    Luminosity,
    /// Sound level in dB
    Sound,
    /// Pressure in psi
    Pressure,
    /// Movement events inside a daily window
    Motion,
}

impl KindTag {
    /// Every kind, in declaration order
    pub const ALL: [KindTag; 7] = [
        KindTag::Thermometer,
        KindTag::WaterLevel,
        KindTag::Humidity,
        KindTag::Luminosity,
        KindTag::Sound,
        KindTag::Pressure,
        KindTag::Motion,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            KindTag::Thermometer => "thermometer",
            KindTag::WaterLevel => "water_level",
            KindTag::Humidity => "humidity",
            KindTag::Luminosity => "luminosity",
            KindTag::Sound => "sound",
            KindTag::Pressure => "pressure",
            KindTag::Motion => "motion",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sensor kind together with its parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorKind {
    /// Temperature walk in a chosen scale
    Thermometer(ThermometerParams),
    /// Tank level bounded by its capacity
    WaterLevel(WaterLevelParams),
    /// Relative humidity in percent
    Humidity(HumidityParams),
    /// Illuminance, unitless on records
    Luminosity(LuminosityParams),
    /// Sound level in dB
    Sound(SoundParams),
    /// Pressure in psi
    Pressure(PressureParams),
    /// Movement events inside a daily window
    Motion(MotionParams),
}

impl SensorKind {
    /// Thermometer with default parameters
    pub fn thermometer() -> Self {
        SensorKind::Thermometer(ThermometerParams::default())
    }

    /// Water level with default parameters
    pub fn water_level() -> Self {
        SensorKind::WaterLevel(WaterLevelParams::default())
    }

    /// Humidity with default parameters
    pub fn humidity() -> Self {
        SensorKind::Humidity(HumidityParams::default())
    }

    /// Luminosity with default parameters
    pub fn luminosity() -> Self {
        SensorKind::Luminosity(LuminosityParams::default())
    }

    /// Sound with default parameters
    pub fn sound() -> Self {
        SensorKind::Sound(SoundParams::default())
    }

    /// Pressure with default parameters
    pub fn pressure() -> Self {
        SensorKind::Pressure(PressureParams::default())
    }

    /// Motion with default parameters
    pub fn motion() -> Self {
        SensorKind::Motion(MotionParams::default())
    }

    /// Discriminant without the parameters
    pub fn tag(&self) -> KindTag {
        match self {
            SensorKind::Thermometer(_) => KindTag::Thermometer,
            SensorKind::WaterLevel(_) => KindTag::WaterLevel,
            SensorKind::Humidity(_) => KindTag::Humidity,
            SensorKind::Luminosity(_) => KindTag::Luminosity,
            SensorKind::Sound(_) => KindTag::Sound,
            SensorKind::Pressure(_) => KindTag::Pressure,
            SensorKind::Motion(_) => KindTag::Motion,
        }
    }

    /// Walk behaviour, `None` for stateless kinds
    pub fn walk(&self) -> Option<&dyn RandomWalk> {
        match self {
            SensorKind::Thermometer(p) => Some(p),
            SensorKind::WaterLevel(p) => Some(p),
            SensorKind::Humidity(p) => Some(p),
            SensorKind::Luminosity(p) => Some(p),
            SensorKind::Sound(p) => Some(p),
            SensorKind::Pressure(p) => Some(p),
            SensorKind::Motion(_) => None,
        }
    }

    /// Check every parameter of the kind
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SensorKind::Motion(p) => p.check_params(),
            other => match other.walk() {
                Some(walk) => walk.check_params(),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        for kind in [
            SensorKind::thermometer(),
            SensorKind::water_level(),
            SensorKind::humidity(),
            SensorKind::luminosity(),
            SensorKind::sound(),
            SensorKind::pressure(),
            SensorKind::motion(),
        ] {
            assert!(kind.validate().is_ok(), "{} defaults invalid", kind.tag());
        }
    }

    #[test]
    fn only_motion_is_stateless() {
        assert!(SensorKind::motion().walk().is_none());
        assert_eq!(SensorKind::sound().walk().map(|w| w.tag()), Some(KindTag::Sound));
    }

    #[test]
    fn deserializes_tagged_map_with_defaults() {
        let kind: SensorKind =
            serde_json::from_str(r#"{"kind": "water_level", "max_level": 200}"#).unwrap();
        match kind {
            SensorKind::WaterLevel(params) => {
                assert_eq!(params.max_level, 200);
                assert_eq!(params.outlier_chance, 5);
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let kind: SensorKind = serde_json::from_str(r#"{"kind": "humidity"}"#).unwrap();
        assert_eq!(kind, SensorKind::humidity());
    }

    #[test]
    fn unknown_kind_fails() {
        assert!(serde_json::from_str::<SensorKind>(r#"{"kind": "seismograph"}"#).is_err());
    }

    #[test]
    fn tag_names_match_serde() {
        for tag in KindTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.name()));
        }
    }
}
