//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0, names non-empty)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("'{}' is not a socket address: {}", config.listener.bind_address, e),
        });
    }

    if let Err(e) = url::Url::parse(&config.lookup.url) {
        errors.push(ValidationError {
            field: "lookup.url",
            message: format!("'{}' is not a URL: {}", config.lookup.url, e),
        });
    }

    if config.lookup.address_field.is_empty() {
        errors.push(ValidationError {
            field: "lookup.address_field",
            message: "must not be empty".to_string(),
        });
    }

    let timeouts = [
        ("timeouts.lookup_secs", config.timeouts.lookup_secs),
        ("timeouts.file_secs", config.timeouts.file_secs),
        ("timeouts.supervisor_secs", config.timeouts.supervisor_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError {
                field,
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if config.supervisor.program.trim().is_empty() {
        errors.push(ValidationError {
            field: "supervisor.program",
            message: "must not be empty".to_string(),
        });
    }
    if config.supervisor.process_name.trim().is_empty() {
        errors.push(ValidationError {
            field: "supervisor.process_name",
            message: "must not be empty".to_string(),
        });
    }

    let paths: [(&'static str, &Path); 5] = [
        ("paths.override_settings", config.paths.override_settings.as_path()),
        ("paths.default_settings", config.paths.default_settings.as_path()),
        ("paths.template", config.paths.template.as_path()),
        ("paths.asset_root", config.paths.asset_root.as_path()),
        ("supervisor.process_path", config.supervisor.process_path.as_path()),
    ];
    for (field, path) in paths {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field,
                message: "must not be empty".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
