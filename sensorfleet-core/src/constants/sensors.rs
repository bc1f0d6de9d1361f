//! Default Parameters per Sensor Kind
//!
//! Each simulated kind is a bounded random walk with an injected outlier.
//! The outlier probability is `chance / denominator`; the denominator is fixed
//! per kind, the chance is configurable.

// ===== SHARED =====

/// Default outlier chance (numerator), shared by every numeric kind.
pub const DEFAULT_OUTLIER_CHANCE: u32 = 5;

/// Fixed offset added to a candidate when an outlier is injected.
///
/// Large enough to push every default range out of bounds in one step,
/// except luminosity, whose range is wide enough to absorb it.
pub const OUTLIER_OFFSET: f64 = 100.0;

/// Decimal places kept in emitted numeric values.
pub const RECORD_DECIMALS: u32 = 2;

// ===== THERMOMETER =====

/// Outlier draw denominator for thermometers.
pub const THERMOMETER_OUTLIER_DENOMINATOR: u32 = 100;

/// Ceiling above which a temperature is always an outlier.
pub const THERMOMETER_LIMIT: f64 = 50.0;

/// Per-step warming range. The thermometer only ever drifts upwards.
pub const THERMOMETER_STEP: (f64, f64) = (0.0, 1.0);

/// Initial temperature range in Celsius.
pub const THERMOMETER_INITIAL_C: (f64, f64) = (18.0, 24.0);

/// Initial temperature range in Fahrenheit.
pub const THERMOMETER_INITIAL_F: (f64, f64) = (64.0, 75.0);

// ===== WATER LEVEL =====

/// Outlier draw denominator for water level sensors.
pub const WATER_OUTLIER_DENOMINATOR: u32 = 100;

/// Default tank capacity.
pub const WATER_MAX_LEVEL: u32 = 100;

/// Integer step range, inclusive.
pub const WATER_STEP: (i32, i32) = (-5, 5);

/// Baseline installed when the level drops below zero.
pub const WATER_RESET_BELOW_ZERO: f64 = 50.0;

/// Baseline installed when the level exceeds capacity.
pub const WATER_RESET_ABOVE_MAX: f64 = 0.0;

// ===== HUMIDITY =====

/// Humidity outlier chance is out of this.
pub const HUMIDITY_OUTLIER_DENOMINATOR: u32 = 100;
/// Valid range, inclusive.
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
/// Recovery baseline range.
pub const HUMIDITY_RESET: (f64, f64) = (10.0, 90.0);
/// Starting value range.
pub const HUMIDITY_INITIAL: (f64, f64) = (10.0, 90.0);

// ===== LUMINOSITY =====

/// Outliers are rare for luminosity: 5 in 100 000 by default.
pub const LUMINOSITY_OUTLIER_DENOMINATOR: u32 = 100_000;
/// Valid range, inclusive.
pub const LUMINOSITY_RANGE: (f64, f64) = (0.0, 100_000.0);
/// Recovery baseline range.
pub const LUMINOSITY_RESET: (f64, f64) = (10.0, 99_990.0);
/// Starting value range.
pub const LUMINOSITY_INITIAL: (f64, f64) = (10.0, 90.0);

// ===== SOUND =====

/// Sound outlier chance is out of this.
pub const SOUND_OUTLIER_DENOMINATOR: u32 = 80;
/// Valid range, inclusive.
pub const SOUND_RANGE: (f64, f64) = (0.0, 90.0);
/// Recovery baseline range.
pub const SOUND_RESET: (f64, f64) = (10.0, 80.0);
/// Starting value range.
pub const SOUND_INITIAL: (f64, f64) = (10.0, 90.0);

// ===== PRESSURE =====

/// Pressure outlier chance is out of this.
pub const PRESSURE_OUTLIER_DENOMINATOR: u32 = 40;
/// Valid range, inclusive.
pub const PRESSURE_RANGE: (f64, f64) = (0.0, 50.0);
/// Recovery baseline range.
pub const PRESSURE_RESET: (f64, f64) = (10.0, 40.0);
/// Starting value range.
pub const PRESSURE_INITIAL: (f64, f64) = (10.0, 40.0);

/// Step range shared by humidity, luminosity, sound and pressure.
pub const SYMMETRIC_STEP: (f64, f64) = (-2.0, 2.0);

// ===== MOTION =====

/// Motion draws are uniform over `0..=100`.
pub const MOTION_CHANCE_DENOMINATOR: u32 = 100;

/// Default chance of reporting motion inside the alert window.
pub const MOTION_DEFAULT_CHANCE: u32 = 5;

/// Default alert window start (hour, minute), local time.
pub const MOTION_WINDOW_START: (u32, u32) = (19, 0);

/// Default alert window length in minutes.
pub const MOTION_WINDOW_MINUTES: u32 = 120;

/// Label sent as the value of a motion record.
pub const MOTION_LABEL: &str = "motion detected";
