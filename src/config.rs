//! Configuration management for the page load monitor

use crate::browser::BrowserSettings;
use crate::measurement::{IST_OFFSET_MINUTES, timestamp_offset};
use crate::monitor::{FailurePolicy, MonitorSettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the dashboard binds to
    pub bind_address: String,

    /// Dashboard port
    pub port: u16,

    /// Directory holding the measurement and summary logs
    pub data_dir: PathBuf,

    /// File name of the measurement log inside `data_dir`
    pub results_file: String,

    /// File name of the summary log inside `data_dir`
    pub summary_file: String,

    /// Sites registered at startup
    pub sites: Vec<String>,

    /// Load time in seconds above which a measurement is flagged
    pub load_time_threshold_secs: f64,

    /// Upper bound for a single navigation, `None` for no bound
    pub navigation_timeout: Option<Duration>,

    /// Keep measuring the remaining sites after one fails to load
    pub isolate_failures: bool,

    /// Fixed offset from UTC used in timestamps, in minutes
    pub timestamp_offset_minutes: i32,

    /// Run Chrome without a visible window
    pub browser_headless: bool,

    /// Pass `--no-sandbox` to Chrome (needed in most containers)
    pub browser_no_sandbox: bool,

    /// Explicit Chrome/Chromium binary
    pub chrome_executable: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            results_file: "results.csv".to_string(),
            summary_file: "summary_report.csv".to_string(),
            sites: Vec::new(),
            load_time_threshold_secs: 3.0,
            navigation_timeout: Some(Duration::from_secs(30)),
            isolate_failures: false,
            timestamp_offset_minutes: IST_OFFSET_MINUTES,
            browser_headless: true,
            browser_no_sandbox: false,
            chrome_executable: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup; unset or unparsable
    /// values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            config.bind_address = bind_address;
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Some(data_dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Some(results_file) = lookup("RESULTS_FILE") {
            config.results_file = results_file;
        }

        if let Some(summary_file) = lookup("SUMMARY_FILE") {
            config.summary_file = summary_file;
        }

        if let Some(sites) = lookup("MONITOR_SITES") {
            config.sites = parse_site_list(&sites);
        }

        if let Some(threshold) = lookup("LOAD_TIME_THRESHOLD_SECONDS") {
            if let Ok(secs) = threshold.parse() {
                config.load_time_threshold_secs = secs;
            }
        }

        if let Some(timeout) = lookup("NAVIGATION_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.navigation_timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
            }
        }

        if let Some(isolate) = lookup("ISOLATE_FAILURES") {
            config.isolate_failures = isolate.to_lowercase() == "true";
        }

        if let Some(offset) = lookup("TIMESTAMP_UTC_OFFSET_MINUTES") {
            if let Ok(minutes) = offset.parse() {
                config.timestamp_offset_minutes = minutes;
            }
        }

        if let Some(headless) = lookup("BROWSER_HEADLESS") {
            config.browser_headless = headless.to_lowercase() != "false";
        }

        if let Some(no_sandbox) = lookup("BROWSER_NO_SANDBOX") {
            config.browser_no_sandbox = no_sandbox.to_lowercase() == "true";
        }

        if let Some(executable) = lookup("CHROME_EXECUTABLE") {
            if !executable.is_empty() {
                config.chrome_executable = Some(PathBuf::from(executable));
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_address.is_empty() {
            return Err("bind_address cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.results_file.is_empty() || self.summary_file.is_empty() {
            return Err("results_file and summary_file cannot be empty".to_string());
        }

        if self.results_file == self.summary_file {
            return Err("results_file and summary_file must differ".to_string());
        }

        if !self.load_time_threshold_secs.is_finite() || self.load_time_threshold_secs < 0.0 {
            return Err("load_time_threshold_secs must be a non-negative number".to_string());
        }

        if timestamp_offset(self.timestamp_offset_minutes).is_none() {
            return Err("timestamp_offset_minutes must be within +/- 24 hours".to_string());
        }

        Ok(())
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(&self.summary_file)
    }

    pub fn monitor_settings(&self) -> Result<MonitorSettings, String> {
        let timestamp_offset = timestamp_offset(self.timestamp_offset_minutes)
            .ok_or_else(|| "invalid timestamp offset".to_string())?;

        Ok(MonitorSettings {
            navigation_timeout: self.navigation_timeout,
            failure_policy: if self.isolate_failures {
                FailurePolicy::Isolate
            } else {
                FailurePolicy::Abort
            },
            alert_threshold: self.load_time_threshold_secs,
            timestamp_offset,
        })
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            headless: self.browser_headless,
            no_sandbox: self.browser_no_sandbox,
            executable: self.chrome_executable.clone(),
        }
    }
}

fn parse_site_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
