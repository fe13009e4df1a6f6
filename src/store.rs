//! Append-only CSV persistence for measurements

use crate::errors::Result;
use crate::measurement::Measurement;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// On-disk row of the measurement log
#[derive(Debug, Serialize, Deserialize)]
struct MeasurementRow {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Load Time (s)")]
    load_time: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl From<&Measurement> for MeasurementRow {
    fn from(m: &Measurement) -> Self {
        Self {
            url: m.url.clone(),
            load_time: format!("{:.3}", m.load_time),
            timestamp: m.timestamp.clone(),
        }
    }
}

impl MeasurementRow {
    fn into_measurement(self) -> Option<Measurement> {
        let load_time = self.load_time.trim().parse::<f64>().ok()?;
        if !load_time.is_finite() || load_time < 0.0 || self.url.is_empty() {
            return None;
        }
        Some(Measurement {
            url: self.url,
            load_time,
            timestamp: self.timestamp,
        })
    }
}

/// Append rows to a CSV log, writing the header first when the log is new.
///
/// The rows of one call are written through a single writer and flushed
/// together; existing content is never rewritten.
pub(crate) fn append_csv_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Append-only measurement log backed by a CSV file
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append a batch of measurements in order
    pub fn append(&self, measurements: &[Measurement]) -> Result<()> {
        let rows: Vec<MeasurementRow> = measurements.iter().map(MeasurementRow::from).collect();

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        append_csv_rows(&self.path, &rows)?;

        debug!("Appended {} measurements to {}", rows.len(), self.path.display());
        Ok(())
    }

    /// Every parsable measurement, in file order
    pub fn read_all(&self) -> Result<Vec<Measurement>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut measurements = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let parsed = record
                .ok()
                .and_then(|r| r.deserialize::<MeasurementRow>(None).ok())
                .and_then(MeasurementRow::into_measurement);

            match parsed {
                Some(m) => measurements.push(m),
                None => debug!("Skipping unparsable row {} in {}", index + 2, self.path.display()),
            }
        }

        Ok(measurements)
    }

    /// The last `n` measurements, oldest first
    pub fn read_latest(&self, n: usize) -> Result<Vec<Measurement>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut all = self.read_all()?;
        let start = all.len().saturating_sub(n);
        Ok(all.split_off(start))
    }
}
