//! Headless browser capability used to time page loads
//!
//! The monitor only needs a narrow slice of a browser: launch it, open a page,
//! navigate and wait for the `load` event, then close everything again. These
//! traits describe that slice so the measurement pipeline can be driven by
//! Chrome in production and by a scripted engine in tests.

mod chromium;

#[cfg(test)]
pub(crate) mod fake;

pub use chromium::{BrowserSettings, ChromiumEngine};

use crate::errors::Result;
use async_trait::async_trait;

/// Launches browser sessions; one session is used per monitoring run
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A running browser instance
#[async_trait]
pub trait BrowserSession: Send {
    /// Open a fresh, blank page
    async fn new_page(&mut self) -> Result<Box<dyn PageSession>>;

    async fn close(&mut self) -> Result<()>;
}

/// A single browser tab
#[async_trait]
pub trait PageSession: Send {
    /// Navigate to `url` and resolve once the page fires its `load` event
    async fn goto(&mut self, url: &str) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}
