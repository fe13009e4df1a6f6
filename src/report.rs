//! Rolling summary report over the full measurement history

use crate::errors::{MonitorError, Result};
use crate::measurement::{SummaryRecord, current_timestamp, mean_load_time, round_to};
use crate::store::{ResultStore, append_csv_rows};
use chrono::FixedOffset;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct SummaryRow {
    #[serde(rename = "Total Entries")]
    total_entries: usize,
    #[serde(rename = "Average Load Time (s)")]
    average_load_time: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl From<&SummaryRecord> for SummaryRow {
    fn from(record: &SummaryRecord) -> Self {
        Self {
            total_entries: record.total_entries,
            average_load_time: record.average_display(),
            timestamp: record.timestamp.clone(),
        }
    }
}

pub struct ReportAggregator {
    store: Arc<ResultStore>,
    summary_path: PathBuf,
    timestamp_offset: FixedOffset,
}

impl ReportAggregator {
    pub fn new(
        store: Arc<ResultStore>,
        summary_path: impl Into<PathBuf>,
        timestamp_offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            summary_path: summary_path.into(),
            timestamp_offset,
        }
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    /// Summarize every recorded measurement and append one row to the
    /// summary log. Fails with [`MonitorError::EmptyInput`] when there is
    /// nothing to average.
    #[instrument(skip(self))]
    pub fn generate(&self) -> Result<SummaryRecord> {
        let measurements = self.store.read_all()?;
        let average_load_time = mean_load_time(&measurements).ok_or(MonitorError::EmptyInput)?;

        let record = SummaryRecord {
            total_entries: measurements.len(),
            average_load_time: round_to(average_load_time, 2),
            timestamp: current_timestamp(self.timestamp_offset),
        };

        append_csv_rows(&self.summary_path, &[SummaryRow::from(&record)])?;

        info!(
            "Summary report saved to {}: {} entries, average {}s",
            self.summary_path.display(),
            record.total_entries,
            record.average_display()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{IST_OFFSET_MINUTES, Measurement, timestamp_offset};
    use std::fs;
    use tempfile::TempDir;

    fn aggregator(dir: &TempDir) -> (ReportAggregator, Arc<ResultStore>) {
        let store = Arc::new(ResultStore::new(dir.path().join("results.csv")));
        let aggregator = ReportAggregator::new(
            store.clone(),
            dir.path().join("summary_report.csv"),
            timestamp_offset(IST_OFFSET_MINUTES).unwrap(),
        );
        (aggregator, store)
    }

    fn record(load_time: f64) -> Measurement {
        Measurement {
            url: "https://example.com/".to_string(),
            load_time,
            timestamp: "12:00:00 01-01-2025".to_string(),
        }
    }

    #[test]
    fn test_generate_over_history() {
        let dir = TempDir::new().unwrap();
        let (aggregator, store) = aggregator(&dir);
        store.append(&[record(1.0), record(2.0)]).unwrap();
        store.append(&[record(3.0)]).unwrap();

        let summary = aggregator.generate().unwrap();

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.average_display(), "2.00");
    }

    #[test]
    fn test_each_generation_appends_one_row() {
        let dir = TempDir::new().unwrap();
        let (aggregator, store) = aggregator(&dir);
        store.append(&[record(1.234)]).unwrap();

        let first = aggregator.generate().unwrap();
        store.append(&[record(2.0)]).unwrap();
        let second = aggregator.generate().unwrap();

        let content = fs::read_to_string(aggregator.summary_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Total Entries,Average Load Time (s),Timestamp");
        assert_eq!(lines[1], format!("1,1.23,{}", first.timestamp));
        assert_eq!(lines[2], format!("2,1.62,{}", second.timestamp));
    }

    #[test]
    fn test_summary_average_is_rounded_to_two_places() {
        let dir = TempDir::new().unwrap();
        let (aggregator, store) = aggregator(&dir);
        store.append(&[record(1.234), record(2.0)]).unwrap();

        let summary = aggregator.generate().unwrap();

        assert_eq!(summary.average_load_time, 1.62);
        assert_eq!(summary.average_display(), "1.62");
    }

    #[test]
    fn test_empty_history_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (aggregator, _) = aggregator(&dir);

        let err = aggregator.generate().unwrap_err();

        assert!(matches!(err, MonitorError::EmptyInput));
        assert!(!aggregator.summary_path().exists());
    }
}
