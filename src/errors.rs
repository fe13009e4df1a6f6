//! Error types for the page load monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug)]
pub enum MonitorError {
    /// The browser failed to load a URL, or the load timed out
    Navigation { url: String, message: String },

    /// Browser launch, page creation or shutdown failed
    Browser(String),

    /// IO operation failed
    Io(std::io::Error),

    /// CSV serialization/deserialization failed
    Csv(csv::Error),

    /// JSON serialization failed
    Json(serde_json::Error),

    /// A URL was rejected by the site registry
    Validation(String),

    /// A summary was requested over an empty measurement log
    EmptyInput,

    /// Configuration error
    Config(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Navigation { url, message } => {
                write!(f, "Navigation to {} failed: {}", url, message)
            }
            MonitorError::Browser(msg) => write!(f, "Browser error: {}", msg),
            MonitorError::Io(err) => write!(f, "IO error: {}", err),
            MonitorError::Csv(err) => write!(f, "CSV error: {}", err),
            MonitorError::Json(err) => write!(f, "JSON error: {}", err),
            MonitorError::Validation(msg) => write!(f, "Validation error: {}", msg),
            MonitorError::EmptyInput => write!(f, "No measurements recorded yet"),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Io(err) => Some(err),
            MonitorError::Csv(err) => Some(err),
            MonitorError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(err)
    }
}

impl From<csv::Error> for MonitorError {
    fn from(err: csv::Error) -> Self {
        MonitorError::Csv(err)
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Json(err)
    }
}

impl From<chromiumoxide::error::CdpError> for MonitorError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        MonitorError::Browser(err.to_string())
    }
}

impl MonitorError {
    pub fn navigation(url: &str, message: impl Into<String>) -> Self {
        MonitorError::Navigation {
            url: url.to_string(),
            message: message.into(),
        }
    }
}
