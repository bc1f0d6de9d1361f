//! Telemetry records emitted by sensors
//!
//! A record is immutable once produced. Its JSON shape is what telemetry
//! sinks put on the wire:
//!
//! ```json
//! {"variable": "temperature", "value": 21.37, "unit": "C", "time": "2024-03-09, 07:05:03"}
//! ```
//!
//! `unit` is omitted when the kind has none.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::sensors::RECORD_DECIMALS;
use crate::time::{format_timestamp, Timestamp};

/// Measured value: numeric for walk-based kinds, text for event kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// Reading of a walk-based kind
    Number(f64),
    /// Event label, such as a motion detection
    Text(String),
}

impl RecordValue {
    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RecordValue::Number(value) => Some(*value),
            RecordValue::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Number(value) => write!(f, "{value}"),
            RecordValue::Text(text) => f.write_str(text),
        }
    }
}

/// One reading ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Variable name on the telemetry backend
    pub variable: String,
    /// Measured value
    pub value: RecordValue,
    /// Unit symbol, omitted for unitless kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Local time of the measurement, `"YYYY-MM-DD, HH:MM:SS"`
    pub time: String,
}

impl Record {
    /// Numeric record, value rounded to two decimals
    pub fn numeric(
        variable: impl Into<String>,
        value: f64,
        unit: Option<&str>,
        measured_at: &Timestamp,
    ) -> Self {
        Self {
            variable: variable.into(),
            value: RecordValue::Number(round2(value)),
            unit: unit.map(str::to_owned),
            time: format_timestamp(measured_at),
        }
    }

    /// Text event record without a unit
    pub fn event(variable: impl Into<String>, label: impl Into<String>, at: &Timestamp) -> Self {
        Self {
            variable: variable.into(),
            value: RecordValue::Text(label.into()),
            unit: None,
            time: format_timestamp(at),
        }
    }

    /// Serialized size in bytes, used for delivery statistics
    pub fn encoded_len(&self) -> usize {
        serde_json::to_vec(self).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.variable, self.value)?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        write!(f, " @ {}", self.time)
    }
}

fn round2(value: f64) -> f64 {
    let scale = 10f64.powi(RECORD_DECIMALS as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn numeric_rounds_to_two_decimals() {
        let record = Record::numeric("pressure", 23.456_78, Some("psi"), &noon());
        assert_eq!(record.value, RecordValue::Number(23.46));
        assert_eq!(record.to_string(), "pressure = 23.46 psi @ 2024-03-09, 12:00:00");
    }

    #[test]
    fn json_omits_missing_unit() {
        let record = Record::numeric("humidity", 55.0, None, &noon());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "variable": "humidity",
                "value": 55.0,
                "time": "2024-03-09, 12:00:00"
            })
        );
    }

    #[test]
    fn event_value_is_text() {
        let record = Record::event("motion", "motion detected", &noon());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["value"], "motion detected");
        assert!(record.value.as_f64().is_none());
        assert!(record.encoded_len() > 0);
    }
}
