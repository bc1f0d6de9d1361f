//! Telemetry Sinks for Simulated Sensor Fleets
//!
//! ## Overview
//!
//! A sensor produces records; something has to carry them to a telemetry
//! backend. This crate defines that boundary as the [`TelemetrySink`] trait
//! and ships two implementations plus the per-sensor retry buffer that sits
//! in front of them.
//!
//! ## Sink Selection Guide
//!
//! ### HTTP (`http` feature, on by default)
//!
//! **When to use:**
//! - Real deployments posting to a cloud telemetry API
//! - The backend authenticates devices by token
//!
//! **Characteristics:**
//! - One POST per batch, body is a JSON array of records
//! - Device token travels in the `Device-Token` header
//! - Transient failures (5xx, 429, transport) retried in-call with backoff
//! - Blocking client, run on tokio's blocking pool
//!
//! ### Memory
//!
//! **When to use:**
//! - Tests that need to see exactly what was delivered
//! - Dry runs without network access
//!
//! **Characteristics:**
//! - Keeps every delivered batch in order
//! - Can be scripted to fail the next N sends
//!
//! ## Delivery Model
//!
//! Each sensor owns a [`SendQueue`]. Every accepted record is appended and
//! the whole pending queue is sent as one batch:
//!
//! ```text
//! append(record)
//! send(pending) -> Ok   => clear pending
//!               -> Err  => keep pending, retry with the next record
//! ```
//!
//! The queue is unbounded. Nothing is dropped on failure and nothing is
//! persisted across restarts.
//!
//! ## Example Usage
//!
//! ```rust
//! use sensorfleet_connectors::{MemorySink, SendQueue};
//! use sensorfleet_core::{SensorInstance, SensorKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = MemorySink::new();
//! let mut sensor = SensorInstance::builder("device-token", SensorKind::pressure()).build()?;
//! let mut queue = SendQueue::new(sensor.token());
//!
//! if let Ok(Some(record)) = sensor.generate() {
//!     queue.enqueue_and_send(&sink, record).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

#[cfg(feature = "http")]
pub mod http;

pub mod memory;
pub mod queue;

// Re-export common types
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpSink};
pub use memory::MemorySink;
pub use queue::SendQueue;

use sensorfleet_core::Record;
use thiserror::Error;

/// Common sink errors
///
/// All variants are recoverable from the sensor's point of view: the batch
/// stays queued and goes out again with the next record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SinkError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Backend refused the device credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Backend answered but declined the batch
    #[error("Batch rejected: {0}")]
    Rejected(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SinkError {
    /// Whether a sink should retry this failure within the same send
    pub fn is_transient(&self) -> bool {
        match self {
            SinkError::Request(_) => true,
            SinkError::ServerError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Acknowledgement of a delivered batch
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAck {
    /// Number of records in the delivered batch
    pub accepted: usize,
    /// Backend's response payload, if it sent one
    pub result: Option<serde_json::Value>,
}

impl DeliveryAck {
    /// Ack for `accepted` records with no payload
    pub fn new(accepted: usize) -> Self {
        Self {
            accepted,
            result: None,
        }
    }
}

/// Trait for all telemetry sinks
///
/// Sinks are shared between sensor units behind an `Arc`, so `send` takes
/// `&self` and implementations keep any mutable state behind a lock.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Deliver a batch of records on behalf of the device holding `credential`
    async fn send(&self, records: &[Record], credential: &str) -> Result<DeliveryAck, SinkError>;

    /// Short name for log lines
    fn name(&self) -> &'static str;
}

/// Delivery statistics kept by each send queue
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeliveryStats {
    /// Batches delivered successfully
    pub batches_sent: u64,
    /// Records delivered across all batches
    pub records_sent: u64,
    /// Sends that failed
    pub failures: u64,
    /// Serialized bytes of delivered records
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(SinkError::Request("reset by peer".into()).is_transient());
        assert!(SinkError::ServerError {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(SinkError::ServerError {
            status: 429,
            message: String::new()
        }
        .is_transient());

        assert!(!SinkError::ServerError {
            status: 404,
            message: String::new()
        }
        .is_transient());
        assert!(!SinkError::Auth("bad token".into()).is_transient());
        assert!(!SinkError::Rejected("nope".into()).is_transient());
    }

    #[test]
    fn error_messages() {
        let err = SinkError::ServerError {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "Server error 502: bad gateway");
    }
}
