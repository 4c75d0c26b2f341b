//! Settings endpoint for a net64 game-server manager.
//!
//! Discovers the host's public address, loads the managed server's settings
//! (override file first, default file second), serves an HTML form
//! pre-filled from those settings, and on submission persists the new
//! settings and restarts the server through the process supervisor.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod settings;
pub mod supervisor;
pub mod template;

pub use config::AppConfig;
pub use error::{SettingsError, SettingsResult};
pub use http::SettingsServer;
pub use lifecycle::Shutdown;
pub use settings::SettingsStore;
