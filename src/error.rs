//! Error taxonomy shared by the settings pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, rendering, or updating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Public address lookup failed or returned nothing usable.
    #[error("Network error: {0}")]
    Network(String),

    /// File read or write failed.
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured data or status table could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Settings update rejected (empty snapshot).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Supervisor start/restart/list failed.
    #[error("Process control error: {0}")]
    ProcessControl(String),

    /// Template or static asset could not be produced.
    #[error("Render error: {0}")]
    Render(String),

    /// The HTTP listener could not be started.
    #[error(transparent)]
    Listener(#[from] crate::net::listener::ListenerError),

    /// An external call exceeded its deadline.
    #[error("{operation} timed out after {secs} seconds")]
    Timeout { operation: &'static str, secs: u64 },
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
