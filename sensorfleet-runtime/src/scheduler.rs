//! Per-Sensor Scheduling
//!
//! ## Overview
//!
//! Each configured sensor becomes a [`SensorUnit`] running on its own tokio
//! task. A unit is strictly sequential:
//!
//! ```text
//! repeat `cycles` times:
//!     sleep(interval)        <- wakes early on shutdown
//!     generate()
//!       Ok(Some(record)) -> enqueue_and_send
//!       Ok(None)         -> nothing to report
//!       Err(rejected)    -> log, next cycle
//! ```
//!
//! Units share nothing but the sink handle, so one slow or failing sensor
//! never holds up another. Neither rejections nor delivery failures end a
//! unit; only its cycle budget or a shutdown signal does.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use sensorfleet_connectors::{SendQueue, TelemetrySink};
use sensorfleet_core::SensorInstance;

use crate::config::FleetConfig;
use crate::error::RuntimeError;

/// Outcome counters for one unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitReport {
    pub name: String,
    pub cycles_run: u32,
    /// Records produced
    pub accepted: u32,
    /// Candidates classified as outliers
    pub rejected: u32,
    /// Cycles where an event sensor had nothing to report
    pub no_event: u32,
    /// Records acknowledged by the sink
    pub delivered: u64,
    pub delivery_failures: u64,
    /// Records still queued when the unit stopped
    pub pending: usize,
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} cycle(s), {} accepted, {} rejected, {} without event, {} delivered, {} failed send(s), {} pending",
            self.name,
            self.cycles_run,
            self.accepted,
            self.rejected,
            self.no_event,
            self.delivered,
            self.delivery_failures,
            self.pending
        )
    }
}

/// One sensor, its send queue and its schedule
#[derive(Debug)]
pub struct SensorUnit {
    name: String,
    instance: SensorInstance,
    queue: SendQueue,
    interval: Duration,
    cycles: u32,
}

impl SensorUnit {
    pub fn new(
        name: impl Into<String>,
        instance: SensorInstance,
        interval: Duration,
        cycles: u32,
    ) -> Self {
        let queue = SendQueue::new(instance.token());
        Self {
            name: name.into(),
            instance,
            queue,
            interval,
            cycles,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> &SensorInstance {
        &self.instance
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Run until the cycle budget is spent or shutdown is signalled
    pub async fn run(
        mut self,
        sink: Arc<dyn TelemetrySink>,
        mut shutdown: watch::Receiver<bool>,
    ) -> UnitReport {
        let mut report = UnitReport {
            name: self.name.clone(),
            ..Default::default()
        };
        debug!(
            "{}: starting {} cycle(s) every {:?}",
            self.name, self.cycles, self.interval
        );

        for _ in 0..self.cycles {
            if sleep_or_shutdown(self.interval, &mut shutdown).await {
                info!("{}: shutdown after {} cycle(s)", self.name, report.cycles_run);
                break;
            }
            report.cycles_run += 1;
            self.cycle(sink.as_ref(), &mut report).await;
        }

        report.pending = self.queue.len();
        report
    }

    async fn cycle(&mut self, sink: &dyn TelemetrySink, report: &mut UnitReport) {
        match self.instance.generate() {
            Ok(Some(record)) => {
                info!("{}: {}", self.name, record);
                report.accepted += 1;

                match self.queue.enqueue_and_send(sink, record).await {
                    Ok(ack) => report.delivered += ack.accepted as u64,
                    // The queue already logged the failure and kept the batch
                    Err(_) => report.delivery_failures += 1,
                }
            }
            Ok(None) => {
                debug!("{}: no event", self.name);
                report.no_event += 1;
            }
            Err(rejected) => {
                warn!("{}: {}", self.name, rejected);
                report.rejected += 1;
            }
        }
    }
}

/// Sleep for `interval`; true if shutdown was signalled first
async fn sleep_or_shutdown(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let signalled = async {
        let outcome = shutdown.wait_for(|stop| *stop).await.map(|_| ());
        // A dropped sender can never signal, so just keep sleeping
        if outcome.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = tokio::time::sleep(interval) => false,
        _ = signalled => true,
    }
}

/// Cloneable handle that stops every unit of a scheduler
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Ask all units to stop; each finishes its current cycle first
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_signalled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Runs a fleet of units concurrently against one sink
pub struct Scheduler {
    units: Vec<SensorUnit>,
    sink: Arc<dyn TelemetrySink>,
    shutdown: ShutdownHandle,
}

impl Scheduler {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            units: Vec::new(),
            sink,
            shutdown: ShutdownHandle { tx: Arc::new(tx) },
        }
    }

    /// Scheduler with one unit per configured sensor
    pub fn from_config(
        config: &FleetConfig,
        cycles: Option<u32>,
        sink: Arc<dyn TelemetrySink>,
    ) -> Result<Self, RuntimeError> {
        let mut scheduler = Self::new(sink);
        for unit in config.build_units(cycles)? {
            scheduler.add_unit(unit);
        }
        Ok(scheduler)
    }

    pub fn add_unit(&mut self, unit: SensorUnit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[SensorUnit] {
        &self.units
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start every unit and wait for all of them
    ///
    /// Reports come back in the order units were added.
    pub async fn run(self) -> Result<Vec<UnitReport>, RuntimeError> {
        info!(
            "Starting {} sensor unit(s) on the {} sink",
            self.units.len(),
            self.sink.name()
        );

        let handles: Vec<_> = self
            .units
            .into_iter()
            .map(|unit| {
                let name = unit.name().to_owned();
                let sink = Arc::clone(&self.sink);
                let shutdown = self.shutdown.tx.subscribe();
                (name, tokio::spawn(unit.run(sink, shutdown)))
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let report = handle.await.map_err(|e| RuntimeError::Task {
                name,
                reason: e.to_string(),
            })?;
            reports.push(report);
        }
        Ok(reports)
    }
}
