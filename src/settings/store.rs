//! Settings cache shared by the loader, renderer, and update handler.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde_json::{Map, Value};

use crate::error::{SettingsError, SettingsResult};

/// The complete value of one namespace: a flat JSON object.
pub type Snapshot = Map<String, Value>;

/// Independent configuration groups held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Facts about the host (e.g. the discovered public address).
    Manager,
    /// Configuration of the managed game server.
    Net64,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Manager => "manager",
            Namespace::Net64 => "net64",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to the cached settings.
///
/// Cloning is cheap and every clone observes the same namespaces. A namespace
/// is either absent (never cached) or holds the last snapshot stored whole;
/// readers never see a half-written snapshot.
#[derive(Clone)]
pub struct SettingsStore {
    manager: Arc<ArcSwapOption<Snapshot>>,
    net64: Arc<ArcSwapOption<Snapshot>>,
}

impl SettingsStore {
    /// Create a store with both namespaces absent.
    pub fn new() -> Self {
        Self {
            manager: Arc::new(ArcSwapOption::empty()),
            net64: Arc::new(ArcSwapOption::empty()),
        }
    }

    fn slot(&self, namespace: Namespace) -> &ArcSwapOption<Snapshot> {
        match namespace {
            Namespace::Manager => &self.manager,
            Namespace::Net64 => &self.net64,
        }
    }

    /// Current snapshot of `namespace`, if one has been cached.
    pub fn get(&self, namespace: Namespace) -> Option<Arc<Snapshot>> {
        self.slot(namespace).load_full()
    }

    /// Replace `namespace` with `snapshot`.
    ///
    /// An empty snapshot is rejected and the namespace keeps its prior value.
    pub fn update(&self, namespace: Namespace, snapshot: Snapshot) -> SettingsResult<Arc<Snapshot>> {
        if snapshot.is_empty() {
            return Err(SettingsError::Validation(format!(
                "settings not updated for {}: no value provided",
                namespace
            )));
        }

        tracing::debug!(namespace = %namespace, keys = snapshot.len(), "Updating cached settings");
        let snapshot = Arc::new(snapshot);
        self.slot(namespace).store(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// The managed process's `port`, as last cached.
    pub fn net64_port(&self) -> Option<Value> {
        self.get(Namespace::Net64)
            .and_then(|snapshot| snapshot.get("port").cloned())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("manager", &self.get(Namespace::Manager))
            .field("net64", &self.get(Namespace::Net64))
            .finish()
    }
}
