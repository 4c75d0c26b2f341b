//! Managed-process settings subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     loader.rs (lookup → manager, override|default file → net64)
//!     → store.rs (SettingsStore, one snapshot per namespace)
//!
//! Per request:
//!     store.rs → template renderer (read)
//!     update.rs (form → snapshot) → store.rs → settings file → supervisor restart
//! ```
//!
//! # Design Decisions
//! - The store is an explicit handle passed to whoever needs it
//! - Each write replaces a namespace whole; overlapping updates are last-write-wins

pub mod loader;
pub mod store;
pub mod update;

pub use loader::{load_manager_settings, load_net64_settings, parse_snapshot, PUBLIC_IP_KEY};
pub use store::{Namespace, SettingsStore, Snapshot};
pub use update::{build_snapshot, FormFields, SettingsUpdater, UpdateOutcome};
