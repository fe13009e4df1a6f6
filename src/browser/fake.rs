//! Scripted browser engine for tests

use super::{BrowserEngine, BrowserSession, PageSession};
use crate::errors::{MonitorError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counters shared between the engine and everything it hands out
#[derive(Debug, Default)]
pub(crate) struct FakeStats {
    pub launches: AtomicUsize,
    pub browsers_closed: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

/// Loads every URL after its configured delay; URLs marked failing error out
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeEngine {
    delays: HashMap<String, Duration>,
    failing: Vec<String>,
    pub stats: Arc<FakeStats>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.stats.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            engine: self.clone(),
        }))
    }
}

struct FakeSession {
    engine: FakeEngine,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_page(&mut self) -> Result<Box<dyn PageSession>> {
        self.engine.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            engine: self.engine.clone(),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        self.engine.stats.browsers_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    engine: FakeEngine,
}

#[async_trait]
impl PageSession for FakePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.engine.stats.visited.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.engine.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.engine.failing.iter().any(|u| u == url) {
            return Err(MonitorError::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.engine.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
