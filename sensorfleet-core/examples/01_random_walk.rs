//! Random Walk with Outlier Injection Example
//!
//! Runs every sensor kind for a few dozen steps on a simulated clock and
//! prints what happens: accepted readings, rejected outliers, and the state
//! resets that bring a sensor back into range.
//!
//! ## What You'll Learn
//!
//! - Building seeded sensors for reproducible output
//! - Driving time by hand with `ManualClock`
//! - Telling rejections apart by their verdict
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_random_walk
//! ```

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use sensorfleet_core::{
    sensors::{HumidityParams, ThermometerParams},
    ManualClock, SensorInstance, SensorKind, ValidationError,
};

const STEPS: usize = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SensorFleet Random Walk Example");
    println!("===============================\n");

    // Evening start so the motion sensor's default window (19:00-21:00) is open
    let clock = ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(19, 30, 0))
            .ok_or("bad start time")?,
    );

    let kinds = vec![
        // Crank the outlier odds so rejections show up in a short run
        SensorKind::Thermometer(ThermometerParams {
            outlier_chance: 20,
            ..Default::default()
        }),
        SensorKind::water_level(),
        SensorKind::Humidity(HumidityParams::default().with_outlier_chance(20)),
        SensorKind::luminosity(),
        SensorKind::sound(),
        SensorKind::pressure(),
        SensorKind::motion(),
    ];

    let mut sensors = kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            SensorInstance::builder(format!("demo-{i}"), kind)
                .seed(i as u64)
                .clock(Arc::new(clock.clone()))
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    for sensor in &mut sensors {
        let mut accepted = 0;
        let mut resets = 0;
        let mut too_fast = 0;
        let mut out_of_range = 0;

        for _ in 0..STEPS {
            clock.advance(Duration::seconds(5));
            match sensor.generate() {
                Ok(Some(record)) => {
                    accepted += 1;
                    if accepted <= 3 {
                        println!("  {record}");
                    }
                }
                Ok(None) => {}
                Err(rejected) => {
                    match rejected.reason {
                        ValidationError::OutOfRange { .. } => out_of_range += 1,
                        ValidationError::RateExceeded { .. } => too_fast += 1,
                        ValidationError::InvalidValue => {}
                    }
                    if rejected.reset_to.is_some() {
                        resets += 1;
                    }
                }
            }
        }

        println!(
            "{:<12} accepted {:>2}/{STEPS}, out of range {:>2}, too fast {:>2}, resets {:>2}\n",
            sensor.tag(),
            accepted,
            out_of_range,
            too_fast,
            resets
        );
    }

    Ok(())
}
