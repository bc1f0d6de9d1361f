//! HTTP Telemetry Sink - Device Token REST Integration
//!
//! ## Overview
//!
//! Posts batches of records to a cloud telemetry API that authenticates each
//! device by token. The wire format is the one such backends expect from
//! their device SDKs:
//!
//! ```text
//! POST {base_url}/data
//! Device-Token: <credential>
//! Content-Type: application/json
//!
//! [{"variable": "temperature", "value": 21.37, "unit": "C", "time": "2024-03-09, 07:05:03"}]
//! ```
//!
//! The backend answers with `{"status": true, "result": ...}` on success. A
//! `"status": false` answer means the batch was understood but declined.
//!
//! ## Retry Policy
//!
//! | Outcome | Action |
//! |---------|--------|
//! | 2xx, `status: true` | ack |
//! | 2xx, `status: false` | `Rejected`, no retry |
//! | 401 / 403 | `Auth`, no retry |
//! | other 4xx | `ServerError`, no retry |
//! | 5xx / 429 / transport | retry up to `max_retries`, backoff 100ms·2^attempt |
//!
//! Whatever fails here is not lost: the caller's send queue keeps the batch
//! and sends it again with the next record.
//!
//! ## Threading
//!
//! `ureq` is a blocking client. Each attempt runs on tokio's blocking pool so
//! a slow backend never stalls the other sensor units.
//!
//! ## Example Usage
//!
//! ```rust
//! use sensorfleet_connectors::http::{HttpConfig, HttpSink};
//!
//! let config = HttpConfig::new("https://api.example.com")
//!     .timeout_secs(10)
//!     .max_retries(2);
//!
//! let sink = HttpSink::new(config)?;
//! # Ok::<(), sensorfleet_connectors::SinkError>(())
//! ```

use crate::{DeliveryAck, SinkError, TelemetrySink};
use log::warn;
use sensorfleet_core::Record;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Default telemetry API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.tago.io";

/// Path appended to the base URL for data ingestion
pub const DATA_PATH: &str = "/data";

/// Header carrying the device credential
pub const TOKEN_HEADER: &str = "Device-Token";

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpConfig {
    /// Create new configuration with base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
            max_retries: 2,
            user_agent: format!("SensorFleet/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set retry count for transient failures
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Full ingestion URL
    pub fn data_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), DATA_PATH)
    }
}

/// Backend response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP sink using lightweight ureq client
#[derive(Debug)]
pub struct HttpSink {
    config: HttpConfig,
    agent: ureq::Agent,
}

impl HttpSink {
    /// Create new HTTP sink
    pub fn new(config: HttpConfig) -> Result<Self, SinkError> {
        // Validate base URL
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(SinkError::Config(
                "Base URL must start with http:// or https://".into(),
            ));
        }
        if config.timeout.is_zero() {
            return Err(SinkError::Config("Timeout must be positive".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Build request with credential and headers
    fn build_request(&self, credential: &str) -> ureq::Request {
        let mut request = self.agent.post(&self.config.data_url());

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request
            .set(TOKEN_HEADER, credential)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    /// Execute request with JSON body and retry logic
    async fn execute_with_retry(
        &self,
        credential: &str,
        json: String,
    ) -> Result<String, SinkError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff
                tokio::time::sleep(backoff(attempt)).await;
            }

            let request = self.build_request(credential);
            let body = json.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                request
                    .send_string(&body)
                    .map_err(classify)
                    .and_then(|resp| {
                        resp.into_string()
                            .map_err(|e| SinkError::Request(e.to_string()))
                    })
            })
            .await
            .map_err(|e| SinkError::Request(format!("send task failed: {e}")))?;

            match outcome {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() => {
                    warn!(
                        "POST {} attempt {}/{} failed: {}",
                        self.config.data_url(),
                        attempt + 1,
                        self.config.max_retries + 1,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // All retries exhausted
        Err(last_error.unwrap_or_else(|| SinkError::Request("Unknown error".into())))
    }
}

#[async_trait::async_trait]
impl TelemetrySink for HttpSink {
    async fn send(&self, records: &[Record], credential: &str) -> Result<DeliveryAck, SinkError> {
        let json =
            serde_json::to_string(records).map_err(|e| SinkError::Serialization(e.to_string()))?;

        let text = self.execute_with_retry(credential, json).await?;
        parse_ack(&text, records.len())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100u64.saturating_mul(1u64 << attempt.min(16)))
}

fn classify(error: ureq::Error) -> SinkError {
    match error {
        ureq::Error::Status(status, resp) => {
            let message = resp.into_string().unwrap_or_default();
            match status {
                401 | 403 => SinkError::Auth(message),
                _ => SinkError::ServerError { status, message },
            }
        }
        ureq::Error::Transport(e) => SinkError::Request(e.to_string()),
    }
}

/// Interpret a 2xx body; an empty body counts as an ack
fn parse_ack(text: &str, accepted: usize) -> Result<DeliveryAck, SinkError> {
    if text.trim().is_empty() {
        return Ok(DeliveryAck::new(accepted));
    }

    let response: ApiResponse =
        serde_json::from_str(text).map_err(|e| SinkError::Serialization(e.to_string()))?;

    if response.status {
        Ok(DeliveryAck {
            accepted,
            result: response.result,
        })
    } else {
        let reason = response
            .message
            .or_else(|| response.result.map(|r| r.to_string()))
            .unwrap_or_else(|| "status false".into());
        Err(SinkError::Rejected(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    fn record() -> Record {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap();
        Record::numeric("temperature", 21.37, Some("C"), &at)
    }

    /// Serve one canned response per connection; hands back each raw request
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let _ = tx.send(read_request(&mut stream));
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });

        (format!("http://{addr}"), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("https://api.example.com/")
            .timeout_secs(60)
            .max_retries(5)
            .header("X-Custom", "value");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert!(config.headers.contains_key("X-Custom"));
        assert_eq!(config.data_url(), "https://api.example.com/data");
        assert_eq!(HttpConfig::default().data_url(), "https://api.tago.io/data");
    }

    #[test]
    fn test_url_validation() {
        let result = HttpSink::new(HttpConfig::new("not-a-url"));
        assert!(matches!(result, Err(SinkError::Config(_))));

        let result = HttpSink::new(HttpConfig::new("https://valid.url").timeout_secs(0));
        assert!(matches!(result, Err(SinkError::Config(_))));

        let result = HttpSink::new(HttpConfig::new("https://valid.url"));
        assert!(result.is_ok());
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert_eq!(backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn ack_parsing() {
        let ack = parse_ack(r#"{"status": true, "result": "1 data added"}"#, 3).unwrap();
        assert_eq!(ack.accepted, 3);
        assert_eq!(ack.result, Some(serde_json::json!("1 data added")));

        assert_eq!(parse_ack("", 2).unwrap(), DeliveryAck::new(2));

        let err = parse_ack(r#"{"status": false, "message": "Invalid token"}"#, 1).unwrap_err();
        assert_eq!(err, SinkError::Rejected("Invalid token".into()));

        assert!(matches!(parse_ack("<html>", 1), Err(SinkError::Serialization(_))));
    }

    #[tokio::test]
    async fn posts_batch_with_device_token() {
        let (url, requests) = serve(vec![(200, r#"{"status":true,"result":"2 data added"}"#)]);
        let sink = HttpSink::new(HttpConfig::new(url).max_retries(0)).unwrap();

        let ack = sink.send(&[record(), record()], "token-123").await.unwrap();
        assert_eq!(ack.accepted, 2);

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /data HTTP/1.1"));
        assert!(request.to_lowercase().contains("device-token: token-123"));
        assert!(request.contains(r#"[{"variable":"temperature","value":21.37,"unit":"C","time":"2024-03-09, 07:05:03"},"#));
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let (url, requests) = serve(vec![
            (503, "busy"),
            (200, r#"{"status":true,"result":"ok"}"#),
        ]);
        let sink = HttpSink::new(HttpConfig::new(url).max_retries(1)).unwrap();

        assert!(sink.send(&[record()], "t").await.is_ok());
        assert_eq!(requests.try_iter().count(), 2);
    }

    #[tokio::test]
    async fn auth_failures_are_not_retried() {
        let (url, requests) = serve(vec![(401, "unauthorized")]);
        let sink = HttpSink::new(HttpConfig::new(url).max_retries(3)).unwrap();

        let err = sink.send(&[record()], "wrong").await.unwrap_err();
        assert_eq!(err, SinkError::Auth("unauthorized".into()));
        assert_eq!(requests.try_iter().count(), 1);
    }

    #[tokio::test]
    async fn declined_batch_is_rejected() {
        let (url, _requests) = serve(vec![(200, r#"{"status":false,"message":"Authorization denied"}"#)]);
        let sink = HttpSink::new(HttpConfig::new(url)).unwrap();

        let err = sink.send(&[record()], "t").await.unwrap_err();
        assert_eq!(err, SinkError::Rejected("Authorization denied".into()));
    }
}
