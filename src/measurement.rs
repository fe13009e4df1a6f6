//! Measurement and summary data structures

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `HH:MM:SS DD-MM-YYYY`
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d-%m-%Y";

/// Indian Standard Time, UTC+05:30
pub const IST_OFFSET_MINUTES: i32 = 330;

/// A single page-load observation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub url: String,
    /// Seconds, millisecond precision
    pub load_time: f64,
    pub timestamp: String,
}

impl Measurement {
    pub fn new(url: impl Into<String>, elapsed: Duration, timestamp: String) -> Self {
        Self {
            url: url.into(),
            load_time: seconds_from_duration(elapsed),
            timestamp,
        }
    }

    pub fn exceeds(&self, threshold_secs: f64) -> bool {
        self.load_time > threshold_secs
    }
}

/// One row of the rolling summary report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SummaryRecord {
    pub total_entries: usize,
    pub average_load_time: f64,
    pub timestamp: String,
}

impl SummaryRecord {
    /// Average rendered the way it is written to the summary log
    pub fn average_display(&self) -> String {
        format!("{:.2}", self.average_load_time)
    }
}

/// Elapsed time in seconds, truncated to whole milliseconds
pub fn seconds_from_duration(elapsed: Duration) -> f64 {
    elapsed.as_millis() as f64 / 1000.0
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Arithmetic mean of the load times, `None` for an empty slice
pub fn mean_load_time(measurements: &[Measurement]) -> Option<f64> {
    if measurements.is_empty() {
        return None;
    }
    let total: f64 = measurements.iter().map(|m| m.load_time).sum();
    Some(total / measurements.len() as f64)
}

/// Build the fixed offset used for human-readable timestamps
pub fn timestamp_offset(offset_minutes: i32) -> Option<FixedOffset> {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

pub fn format_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}

pub fn current_timestamp(offset: FixedOffset) -> String {
    format_timestamp(Utc::now(), offset)
}
