//! Resolution of each namespace from its sources.
//!
//! # Responsibilities
//! - Manager: discover the public address (best effort)
//! - Net64: override file first, default file as fallback
//!
//! # Design Decisions
//! - An override found at startup is written through to the default
//!   location, since the managed process only reads that file
//! - The override is never consulted again after startup

use serde_json::Value;

use crate::config::{SettingsPaths, TimeoutConfig};
use crate::error::{SettingsError, SettingsResult};
use crate::net::PublicAddressLookup;
use crate::resilience::timeouts::{read_file, write_file};
use crate::settings::store::Snapshot;

/// Key the discovered address is cached under in the manager namespace.
pub const PUBLIC_IP_KEY: &str = "publicIp";

/// Build the manager namespace from a public address lookup.
pub async fn load_manager_settings(lookup: &PublicAddressLookup) -> SettingsResult<Snapshot> {
    tracing::info!("Loading manager settings");
    let address = lookup.public_address().await?;

    let mut snapshot = Snapshot::new();
    snapshot.insert(PUBLIC_IP_KEY.to_string(), Value::String(address));
    Ok(snapshot)
}

/// Build the net64 namespace from the override or default settings file.
pub async fn load_net64_settings(
    paths: &SettingsPaths,
    timeouts: &TimeoutConfig,
) -> SettingsResult<Snapshot> {
    tracing::info!(path = %paths.override_settings.display(), "Loading override net64 settings");

    let content = match read_file(&paths.override_settings, timeouts.file_secs).await {
        Ok(content) => {
            tracing::info!(
                from = %paths.override_settings.display(),
                to = %paths.default_settings.display(),
                "Override found, writing through to default settings"
            );
            write_file(&paths.default_settings, content.as_bytes(), timeouts.file_secs).await?;
            content
        }
        Err(e) => {
            tracing::info!(
                error = %e,
                path = %paths.default_settings.display(),
                "No usable override, loading default net64 settings"
            );
            read_file(&paths.default_settings, timeouts.file_secs).await?
        }
    };

    parse_snapshot(&content)
}

/// Parse a settings document; only a JSON object is a valid snapshot.
pub fn parse_snapshot(content: &str) -> SettingsResult<Snapshot> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        other => Err(SettingsError::Parse(format!(
            "settings must be a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
