//! Per-Sensor Send Queue
//!
//! ## Overview
//!
//! Every sensor unit owns one queue. Records that could not be delivered stay
//! here and ride along with the next accepted record, so the backend always
//! receives them in production order:
//!
//! ```text
//! cycle 1: pending [A]    send [A]    -> fails, keep [A]
//! cycle 2: pending [A, B] send [A, B] -> ok,    clear
//! ```
//!
//! The queue is unbounded and lives only in memory. A sensor that is offline
//! for a long time accumulates every record it produced until the sink
//! recovers or the process exits.

use log::{debug, warn};
use sensorfleet_core::Record;

use crate::{DeliveryAck, DeliveryStats, SinkError, TelemetrySink};

/// Unsent records for one device credential
#[derive(Debug, Clone)]
pub struct SendQueue {
    credential: String,
    pending: Vec<Record>,
    stats: DeliveryStats,
}

impl SendQueue {
    /// Empty queue sending on behalf of `credential`
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            pending: Vec::new(),
            stats: DeliveryStats::default(),
        }
    }

    /// Append `record` and try to deliver everything pending as one batch
    ///
    /// On success the queue is empty afterwards. On failure nothing is
    /// dropped; the error is returned for the caller to log.
    pub async fn enqueue_and_send(
        &mut self,
        sink: &dyn TelemetrySink,
        record: Record,
    ) -> Result<DeliveryAck, SinkError> {
        self.pending.push(record);
        self.flush(sink).await
    }

    /// Send whatever is pending without adding a record
    pub async fn flush(&mut self, sink: &dyn TelemetrySink) -> Result<DeliveryAck, SinkError> {
        if self.pending.is_empty() {
            return Ok(DeliveryAck::new(0));
        }

        match sink.send(&self.pending, &self.credential).await {
            Ok(ack) => {
                let bytes: usize = self.pending.iter().map(Record::encoded_len).sum();
                debug!(
                    "{} delivered batch of {} record(s)",
                    sink.name(),
                    self.pending.len()
                );

                self.stats.batches_sent += 1;
                self.stats.records_sent += self.pending.len() as u64;
                self.stats.bytes_sent += bytes as u64;
                self.pending.clear();
                Ok(ack)
            }
            Err(e) => {
                warn!(
                    "{} delivery failed, {} record(s) kept for retry: {}",
                    sink.name(),
                    self.pending.len(),
                    e
                );
                self.stats.failures += 1;
                self.stats.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Records waiting for delivery, oldest first
    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn stats(&self) -> &DeliveryStats {
        &self.stats
    }
}
