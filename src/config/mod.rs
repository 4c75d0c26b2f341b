//! Configuration of the settings endpoint itself.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config)
//!     → loader.rs (parse & deserialize, defaults for absent fields)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → cloned into the startup sequence and the HTTP state
//! ```
//!
//! # Design Decisions
//! - This is not the managed process's configuration; that lives in the
//!   settings store and is edited through the form
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AppConfig, HttpConfig, ListenerConfig, LogFormat, LookupConfig, ObservabilityConfig,
    SettingsPaths, SupervisorConfig, TimeoutConfig,
};
