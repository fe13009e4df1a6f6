//! Page Load Monitor Library
//!
//! Measures page-load latency for a set of URLs with a headless browser,
//! records every measurement in an append-only CSV log, summarizes the
//! history into a rolling report and serves a small dashboard to manage the
//! monitored sites.

pub mod browser;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod measurement;
pub mod monitor;
pub mod registry;
pub mod report;
pub mod store;

pub use config::Config;
pub use errors::{MonitorError, Result};
pub use measurement::{Measurement, SummaryRecord};
pub use monitor::{FailurePolicy, Monitor, MonitorSettings, UrlFailure, RunReport};
pub use registry::SiteRegistry;
pub use report::ReportAggregator;
pub use store::ResultStore;
