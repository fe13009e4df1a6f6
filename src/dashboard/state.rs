use std::sync::Arc;

use crate::monitor::Monitor;
use crate::registry::SiteRegistry;
use crate::store::ResultStore;

/// Shared by every dashboard worker; the registry lives only in memory
pub struct AppState {
    pub registry: SiteRegistry,
    pub monitor: Monitor,
    pub store: Arc<ResultStore>,
}

impl AppState {
    pub fn new(registry: SiteRegistry, monitor: Monitor, store: Arc<ResultStore>) -> Self {
        Self {
            registry,
            monitor,
            store,
        }
    }

    pub fn alert_threshold(&self) -> f64 {
        self.monitor.settings().alert_threshold
    }
}
