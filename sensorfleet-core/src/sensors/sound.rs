//! Sound level, 0-90 dB

use crate::constants::sensors::{SOUND_INITIAL, SOUND_OUTLIER_DENOMINATOR, SOUND_RANGE, SOUND_RESET};
use crate::kind::KindTag;

use super::ranged::{RangeProfile, RangedParams};

/// Sound profile marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sound;

impl RangeProfile for Sound {
    const TAG: KindTag = KindTag::Sound;
    const VARIABLE: &'static str = "sound";
    const UNIT: Option<&'static str> = Some("dB");
    const OUTLIER_DENOMINATOR: u32 = SOUND_OUTLIER_DENOMINATOR;
    const RANGE: (f64, f64) = SOUND_RANGE;
    const RESET: (f64, f64) = SOUND_RESET;
    const INITIAL: (f64, f64) = SOUND_INITIAL;
}

/// Sound parameters
pub type SoundParams = RangedParams<Sound>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RandomWalk;

    #[test]
    fn defaults() {
        let params = SoundParams::default();
        assert_eq!((params.min, params.max), (0.0, 90.0));
        assert_eq!(params.unit(), Some("dB"));
        assert_eq!(params.outlier_odds().probability(), 5.0 / 80.0);
    }

    #[test]
    fn chance_above_denominator_is_rejected() {
        let params = SoundParams::default().with_outlier_chance(81);
        assert!(params.check_params().is_err());
    }
}
