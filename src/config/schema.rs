//! Configuration schema definitions.
//!
//! This module defines the runtime configuration of the settings endpoint.
//! All types derive Serde traits for deserialization from a TOML file, and
//! every field has a default so an empty (or absent) file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the settings endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// File locations for settings, template, and static assets.
    pub paths: SettingsPaths,

    /// Public address lookup service.
    pub lookup: LookupConfig,

    /// Process supervisor settings.
    pub supervisor: SupervisorConfig,

    /// Deadlines for external calls.
    pub timeouts: TimeoutConfig,

    /// Response tweaks.
    pub http: HttpConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Locations of everything the endpoint reads or writes on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsPaths {
    /// Optional override settings, consulted at startup only.
    pub override_settings: PathBuf,

    /// Settings file the managed process reads; updates are written here.
    pub default_settings: PathBuf,

    /// HTML form template with `${key}` placeholders.
    pub template: PathBuf,

    /// Root directory for `.css` and `.js` assets.
    pub asset_root: PathBuf,
}

impl Default for SettingsPaths {
    fn default() -> Self {
        Self {
            override_settings: PathBuf::from("/usr/src/overrides/settings.json"),
            default_settings: PathBuf::from("/usr/src/net64plus-server-master/settings.json"),
            template: PathBuf::from("/usr/src/settings/dist/settings.html"),
            asset_root: PathBuf::from("/usr/src/settings/dist"),
        }
    }
}

/// Public address lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Lookup endpoint returning a JSON document.
    pub url: String,

    /// Field of the JSON document holding the public address.
    pub address_field: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: "http://ip-api.com/json".to_string(),
            address_field: "query".to_string(),
        }
    }
}

/// Process supervisor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Supervisor executable.
    pub program: String,

    /// Name the managed process is registered under.
    pub process_name: String,

    /// Path handed to the supervisor when starting the managed process.
    pub process_path: PathBuf,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            program: "pm2".to_string(),
            process_name: "net64".to_string(),
            process_path: PathBuf::from("/usr/src/net64plus-server-master/dist"),
        }
    }
}

/// Timeout configuration for external calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Public address lookup timeout in seconds.
    pub lookup_secs: u64,

    /// File read/write timeout in seconds.
    pub file_secs: u64,

    /// Supervisor command timeout in seconds.
    pub supervisor_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            lookup_secs: 10,
            file_secs: 5,
            supervisor_secs: 30,
        }
    }
}

/// HTTP response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Content type served for `.js` assets.
    pub js_content_type: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            js_content_type: "application/json".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
