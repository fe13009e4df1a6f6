//! In-memory list of monitored sites

use crate::errors::{MonitorError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::RwLock;
use tracing::{debug, info};

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://.+\..+").expect("valid URL pattern"))
}

/// Minimal `scheme://host.tld` shape check
pub fn is_valid_site_url(url: &str) -> bool {
    url_pattern().is_match(url)
}

/// Monitored URLs in insertion order. Lost on restart.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: RwLock<Vec<String>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from seed URLs; invalid and duplicate seeds are dropped
    pub async fn with_sites<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::new();
        for seed in seeds {
            registry.add(seed.as_ref()).await;
        }
        registry
    }

    /// Insert a URL. Returns `false` when it is malformed or already present.
    pub async fn add(&self, url: &str) -> bool {
        match self.try_add(url).await {
            Ok(inserted) => inserted,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    /// Insert a URL, reporting malformed input as a validation error.
    /// `Ok(false)` means the URL was already registered.
    pub async fn try_add(&self, url: &str) -> Result<bool> {
        let url = url.trim();
        if !is_valid_site_url(url) {
            return Err(MonitorError::Validation(format!(
                "{:?} is not an http(s) URL with a domain",
                url
            )));
        }

        let mut sites = self.sites.write().await;
        if sites.iter().any(|existing| existing == url) {
            debug!("Site already registered: {}", url);
            return Ok(false);
        }

        sites.push(url.to_string());
        info!("Registered site {} ({} total)", url, sites.len());
        Ok(true)
    }

    pub async fn remove(&self, url: &str) {
        let mut sites = self.sites.write().await;
        let before = sites.len();
        sites.retain(|existing| existing != url);

        if sites.len() < before {
            info!("Removed site {}", url);
        }
    }

    pub async fn list(&self) -> Vec<String> {
        self.sites.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.sites.read().await.len()
    }
}
