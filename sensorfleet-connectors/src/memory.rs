//! In-Memory Telemetry Sink
//!
//! Keeps every delivered batch for later inspection. Used by tests, and by
//! the CLI's dry-run mode where it also logs each record instead of
//! posting it anywhere.

use std::sync::{Mutex, MutexGuard};

use log::info;
use sensorfleet_core::Record;

use crate::{DeliveryAck, SinkError, TelemetrySink};

/// One batch as the sink received it
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredBatch {
    pub credential: String,
    pub records: Vec<Record>,
}

#[derive(Debug, Default)]
struct State {
    batches: Vec<DeliveredBatch>,
    fail_remaining: u32,
    attempts: u64,
}

/// Sink that stores batches instead of sending them
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<State>,
    log_records: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that also logs every delivered record at `info`
    pub fn dry_run() -> Self {
        Self {
            state: Mutex::default(),
            log_records: true,
        }
    }

    /// Make the next `count` sends fail with a request error
    pub fn fail_next(&self, count: u32) {
        self.lock().fail_remaining = count;
    }

    /// All delivered batches, oldest first
    pub fn batches(&self) -> Vec<DeliveredBatch> {
        self.lock().batches.clone()
    }

    /// Delivered records for one credential, in delivery order
    pub fn records_for(&self, credential: &str) -> Vec<Record> {
        self.lock()
            .batches
            .iter()
            .filter(|batch| batch.credential == credential)
            .flat_map(|batch| batch.records.iter().cloned())
            .collect()
    }

    /// Number of `send` calls, failed ones included
    pub fn send_attempts(&self) -> u64 {
        self.lock().attempts
    }

    // A panicking test thread must not hide the batches from the others
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl TelemetrySink for MemorySink {
    async fn send(&self, records: &[Record], credential: &str) -> Result<DeliveryAck, SinkError> {
        let mut state = self.lock();
        state.attempts += 1;

        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            return Err(SinkError::Request("scripted failure".into()));
        }

        if self.log_records {
            for record in records {
                info!("[dry-run] {credential}: {record}");
            }
        }

        state.batches.push(DeliveredBatch {
            credential: credential.to_owned(),
            records: records.to_vec(),
        });
        Ok(DeliveryAck::new(records.len()))
    }

    fn name(&self) -> &'static str {
        if self.log_records {
            "dry-run"
        } else {
            "memory"
        }
    }
}
