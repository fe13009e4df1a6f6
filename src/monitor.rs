//! Monitoring runs: time page loads for a list of URLs and persist the batch

use crate::browser::{BrowserEngine, BrowserSession};
use crate::errors::{MonitorError, Result};
use crate::measurement::{Measurement, current_timestamp, mean_load_time, round_to};
use crate::store::ResultStore;
use chrono::FixedOffset;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// What happens when one URL fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; nothing from the run is persisted
    #[default]
    Abort,
    /// Record the failure and keep measuring the remaining URLs
    Isolate,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// `None` leaves navigations unbounded
    pub navigation_timeout: Option<Duration>,
    pub failure_policy: FailurePolicy,
    /// Seconds; slower loads are logged at WARN level
    pub alert_threshold: f64,
    pub timestamp_offset: FixedOffset,
}

/// A URL that could not be measured under [`FailurePolicy::Isolate`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UrlFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub measurements: Vec<Measurement>,
    pub failures: Vec<UrlFailure>,
    /// Mean load time of this run's measurements, 3 decimals
    pub average_load_time: Option<f64>,
}

pub struct Monitor {
    engine: Arc<dyn BrowserEngine>,
    store: Arc<ResultStore>,
    settings: MonitorSettings,
}

impl Monitor {
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        store: Arc<ResultStore>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            engine,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Measure every URL in order with a single browser launch, then append
    /// the whole batch to the result store.
    #[instrument(skip(self, urls), fields(run_id = tracing::field::Empty, url_count = urls.len()))]
    pub async fn run(&self, urls: &[String]) -> Result<RunReport> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!("Starting monitoring run over {} URLs", urls.len());

        if urls.is_empty() {
            info!("No URLs to monitor, skipping browser launch");
            return Ok(RunReport {
                run_id,
                measurements: Vec::new(),
                failures: Vec::new(),
                average_load_time: None,
            });
        }

        let mut session = self.engine.launch().await?;
        let outcome = self.measure_all(session.as_mut(), urls).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {}", e);
        }

        let (measurements, failures) = outcome?;

        let store = self.store.clone();
        let batch = measurements.clone();
        tokio::task::spawn_blocking(move || store.append(&batch))
            .await
            .map_err(|e| MonitorError::Io(std::io::Error::other(e)))??;

        let average_load_time = mean_load_time(&measurements).map(|avg| round_to(avg, 3));
        info!(
            "Monitoring run complete: {} measured, {} failed, average {:?}s",
            measurements.len(),
            failures.len(),
            average_load_time
        );

        Ok(RunReport {
            run_id,
            measurements,
            failures,
            average_load_time,
        })
    }

    async fn measure_all(
        &self,
        session: &mut dyn BrowserSession,
        urls: &[String],
    ) -> Result<(Vec<Measurement>, Vec<UrlFailure>)> {
        let mut measurements = Vec::with_capacity(urls.len());
        let mut failures = Vec::new();

        for url in urls {
            match self.measure(session, url).await {
                Ok(measurement) => {
                    if measurement.exceeds(self.settings.alert_threshold) {
                        warn!(
                            url = %measurement.url,
                            "Load time {:.3}s exceeds threshold of {}s",
                            measurement.load_time,
                            self.settings.alert_threshold
                        );
                    }
                    measurements.push(measurement);
                }
                Err(e) if self.settings.failure_policy == FailurePolicy::Isolate => {
                    error!(url = %url, "Measurement failed, continuing: {}", e);
                    failures.push(UrlFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    error!(url = %url, "Measurement failed, aborting run: {}", e);
                    return Err(e);
                }
            }
        }

        Ok((measurements, failures))
    }

    async fn measure(&self, session: &mut dyn BrowserSession, url: &str) -> Result<Measurement> {
        let mut page = session.new_page().await?;

        let start = Instant::now();
        let navigation = match self.settings.navigation_timeout {
            Some(limit) => match timeout(limit, page.goto(url)).await {
                Ok(result) => result,
                Err(_) => Err(MonitorError::navigation(
                    url,
                    format!("timed out after {}s", limit.as_secs_f64()),
                )),
            },
            None => page.goto(url).await,
        };
        let elapsed = start.elapsed();

        if let Err(e) = page.close().await {
            warn!(url = %url, "Failed to close page: {}", e);
        }
        navigation?;

        let measurement = Measurement::new(
            url,
            elapsed,
            current_timestamp(self.settings.timestamp_offset),
        );
        debug!(url = %url, "Loaded in {:.3}s", measurement.load_time);
        Ok(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakeEngine;
    use crate::measurement::{IST_OFFSET_MINUTES, timestamp_offset};
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    fn settings(policy: FailurePolicy) -> MonitorSettings {
        MonitorSettings {
            navigation_timeout: Some(Duration::from_secs(30)),
            failure_policy: policy,
            alert_threshold: 3.0,
            timestamp_offset: timestamp_offset(IST_OFFSET_MINUTES).unwrap(),
        }
    }

    fn monitor(engine: &FakeEngine, dir: &TempDir, policy: FailurePolicy) -> (Monitor, Arc<ResultStore>) {
        let store = Arc::new(ResultStore::new(dir.path().join("results.csv")));
        let monitor = Monitor::new(Arc::new(engine.clone()), store.clone(), settings(policy));
        (monitor, store)
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_measures_each_url_in_order() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new()
            .with_delay("https://a.com/", Duration::from_millis(1200))
            .with_delay("https://b.com/", Duration::from_millis(300));
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Abort);

        let targets = urls(&["https://a.com/", "https://b.com/"]);
        let report = monitor.run(&targets).await.unwrap();

        assert_eq!(report.measurements.len(), 2);
        assert_eq!(report.measurements[0].url, "https://a.com/");
        assert_eq!(report.measurements[1].url, "https://b.com/");
        assert!((report.measurements[0].load_time - 1.2).abs() < 0.005);
        assert!((report.measurements[1].load_time - 0.3).abs() < 0.005);
        assert!(report.failures.is_empty());

        let a = report.measurements[0].load_time;
        let b = report.measurements[1].load_time;
        assert_eq!(report.average_load_time, Some(round_to((a + b) / 2.0, 3)));

        assert_eq!(store.read_latest(2).unwrap(), report.measurements);
    }

    #[tokio::test]
    async fn test_run_launches_browser_once() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new();
        let (monitor, _) = monitor(&engine, &dir, FailurePolicy::Abort);

        let report = monitor
            .run(&urls(&["https://a.com/", "https://b.com/", "https://c.com/"]))
            .await
            .unwrap();

        assert_eq!(report.measurements.len(), 3);
        assert!(report.measurements.iter().all(|m| m.load_time >= 0.0));
        assert_eq!(engine.stats.launches.load(Ordering::SeqCst), 1);
        assert_eq!(engine.stats.browsers_closed.load(Ordering::SeqCst), 1);
        assert_eq!(engine.stats.pages_opened.load(Ordering::SeqCst), 3);
        assert_eq!(engine.stats.pages_closed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_and_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new().failing("https://broken.example/");
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Abort);

        let result = monitor
            .run(&urls(&["https://a.com/", "https://broken.example/", "https://c.com/"]))
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, MonitorError::Navigation { ref url, .. } if url == "https://broken.example/"));
        assert_eq!(engine.visited(), urls(&["https://a.com/", "https://broken.example/"]));
        assert_eq!(engine.stats.browsers_closed.load(Ordering::SeqCst), 1);
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_isolate_policy_keeps_measuring() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new().failing("https://broken.example/");
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Isolate);

        let report = assert_ok!(
            monitor
                .run(&urls(&["https://a.com/", "https://broken.example/", "https://c.com/"]))
                .await
        );

        let measured: Vec<&str> = report.measurements.iter().map(|m| m.url.as_str()).collect();
        assert_eq!(measured, vec!["https://a.com/", "https://c.com/"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://broken.example/");
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_timeout() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new().with_delay("https://slow.example/", Duration::from_secs(120));
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Abort);

        let err = monitor.run(&urls(&["https://slow.example/"])).await.unwrap_err();

        match err {
            MonitorError::Navigation { url, message } => {
                assert_eq!(url, "https://slow.example/");
                assert!(message.contains("timed out"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(engine.stats.pages_closed.load(Ordering::SeqCst), 1);
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_empty_run_has_no_average() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new();
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Abort);

        let report = monitor.run(&[]).await.unwrap();

        assert!(report.measurements.is_empty());
        assert!(report.average_load_time.is_none());
        assert!(!store.exists());
        assert_eq!(engine.stats.launches.load(Ordering::SeqCst), 0);
        assert_eq!(engine.stats.browsers_closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_consecutive_runs_append_in_order() {
        let dir = TempDir::new().unwrap();
        let engine = FakeEngine::new();
        let (monitor, store) = monitor(&engine, &dir, FailurePolicy::Abort);

        let first = monitor.run(&urls(&["https://a.com/", "https://b.com/"])).await.unwrap();
        let second = monitor.run(&urls(&["https://c.com/"])).await.unwrap();

        let mut expected = first.measurements.clone();
        expected.extend(second.measurements);
        assert_eq!(store.read_all().unwrap(), expected);
    }
}
