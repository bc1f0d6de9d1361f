//! Fleet runtime for SensorFleet
//!
//! Loads a fleet configuration, turns each sensor entry into a
//! [`SensorUnit`] and runs all units concurrently against one
//! [`TelemetrySink`](sensorfleet_connectors::TelemetrySink).
//!
//! ```no_run
//! use std::sync::Arc;
//! use sensorfleet_connectors::MemorySink;
//! use sensorfleet_runtime::{FleetConfig, Scheduler};
//!
//! # async fn example() -> Result<(), sensorfleet_runtime::RuntimeError> {
//! let config = FleetConfig::load("fleet.json")?;
//! let scheduler = Scheduler::from_config(&config, Some(10), Arc::new(MemorySink::dry_run()))?;
//!
//! for report in scheduler.run().await? {
//!     println!("{report}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod scheduler;

pub use cli::Cli;
pub use config::{FleetConfig, SensorConfig, SinkConfig};
pub use error::RuntimeError;
pub use scheduler::{Scheduler, SensorUnit, ShutdownHandle, UnitReport};
