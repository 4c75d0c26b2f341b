//! Public address discovery.
//!
//! Queries an IP-geolocation style service once at startup. The service
//! answers with a JSON document; the configured field holds the address.

use serde_json::Value;

use crate::config::LookupConfig;
use crate::error::{SettingsError, SettingsResult};
use crate::resilience::timeouts::with_timeout;

/// Client for the public address lookup service.
#[derive(Debug, Clone)]
pub struct PublicAddressLookup {
    client: reqwest::Client,
    url: String,
    address_field: String,
    timeout_secs: u64,
}

impl PublicAddressLookup {
    pub fn new(config: &LookupConfig, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            address_field: config.address_field.clone(),
            timeout_secs,
        }
    }

    /// Ask the service for this host's public address.
    pub async fn public_address(&self) -> SettingsResult<String> {
        tracing::debug!(url = %self.url, "Looking up public address");

        let body = with_timeout("address lookup", self.timeout_secs, async {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| SettingsError::Network(format!("Lookup service failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SettingsError::Network(format!(
                    "Lookup service returned status {}",
                    status
                )));
            }

            response
                .text()
                .await
                .map_err(|e| SettingsError::Network(format!("Lookup service failed: {}", e)))
        })
        .await?;

        extract_address(&body, &self.address_field)
    }
}

/// Pull the address out of a lookup response body.
pub fn extract_address(body: &str, field: &str) -> SettingsResult<String> {
    if body.trim().is_empty() {
        return Err(SettingsError::Network("No data returned".to_string()));
    }

    let document: Value = serde_json::from_str(body)
        .map_err(|e| SettingsError::Network(format!("Malformed lookup response: {}", e)))?;

    document
        .get(field)
        .and_then(Value::as_str)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SettingsError::Network(format!("Lookup response has no '{}' field", field)))
}
