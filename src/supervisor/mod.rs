//! Process supervisor subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:         start(name, path)  → managed process running
//! Settings update: restart(name)      → managed process rereads settings
//! Status:          list() → table.rs  → ProcessStatusRow
//! ```
//!
//! # Design Decisions
//! - The supervisor is a trait object so the HTTP layer and startup
//!   sequence never spawn commands directly
//! - pm2.rs shells out to the supervisor CLI; tests substitute a recorder

pub mod pm2;
pub mod table;

use std::path::Path;

use async_trait::async_trait;

use crate::error::{SettingsError, SettingsResult};

pub use pm2::Pm2Supervisor;
pub use table::{parse_status_rows, parse_status_table, ProcessStatusRow};

/// Operations consumed from the external process supervisor.
#[async_trait]
pub trait ProcessSupervisor: Send + Sync {
    /// Start the process at `path` under `name`.
    async fn start(&self, name: &str, path: &Path) -> SettingsResult<()>;

    /// Restart the process registered as `name`.
    async fn restart(&self, name: &str) -> SettingsResult<()>;

    /// Raw status table of every supervised process.
    async fn list(&self) -> SettingsResult<String>;
}

/// Look up `name` in the supervisor's status table.
pub async fn process_status(
    supervisor: &dyn ProcessSupervisor,
    name: &str,
) -> SettingsResult<ProcessStatusRow> {
    let listing = supervisor.list().await?;
    let rows = parse_status_rows(&listing)?;

    rows.into_iter()
        .find(|row| {
            row.get("app_name")
                .or_else(|| row.get("name"))
                .is_some_and(|value| value == name)
        })
        .ok_or_else(|| SettingsError::ProcessControl(format!("process '{}' is not supervised", name)))
}
