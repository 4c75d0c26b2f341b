//! Applying a submitted settings form.
//!
//! # Responsibilities
//! - Turn form fields into a net64 snapshot (webhook flag coerced, port preserved)
//! - Cache, persist, then restart the managed process, in that order
//!
//! # Design Decisions
//! - An empty form is a page view, not a submission: no side effects
//! - The form never edits `port`; the cached value always wins
//! - The default settings file is overwritten whole, never patched

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::error::SettingsResult;
use crate::resilience::timeouts::write_file;
use crate::settings::store::{Namespace, SettingsStore, Snapshot};
use crate::supervisor::ProcessSupervisor;

/// Decoded `application/x-www-form-urlencoded` body.
pub type FormFields = BTreeMap<String, String>;

/// Form field carrying the webhook toggle.
pub const WEBHOOK_FIELD: &str = "enableWebHook";

/// Field copied from the cached snapshot instead of the form.
pub const PORT_FIELD: &str = "port";

/// Result of handling a request body.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Body was empty; nothing changed.
    Skipped,
    /// Snapshot cached, persisted, and the process restarted.
    Applied(Arc<Snapshot>),
}

/// Build the snapshot to store from submitted fields.
pub fn build_snapshot(form: &FormFields, cached_port: Option<Value>) -> Snapshot {
    let mut snapshot: Snapshot = form
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();

    let enabled = form.get(WEBHOOK_FIELD).is_some_and(|value| value == "true");
    snapshot.insert(WEBHOOK_FIELD.to_string(), Value::Bool(enabled));

    match cached_port {
        Some(port) => {
            snapshot.insert(PORT_FIELD.to_string(), port);
        }
        None => {
            snapshot.remove(PORT_FIELD);
        }
    }

    snapshot
}

/// Applies settings submissions for one managed process.
pub struct SettingsUpdater {
    store: SettingsStore,
    supervisor: Arc<dyn ProcessSupervisor>,
    settings_path: PathBuf,
    process_name: String,
    file_timeout_secs: u64,
}

impl SettingsUpdater {
    pub fn new(
        store: SettingsStore,
        supervisor: Arc<dyn ProcessSupervisor>,
        settings_path: PathBuf,
        process_name: String,
        file_timeout_secs: u64,
    ) -> Self {
        Self {
            store,
            supervisor,
            settings_path,
            process_name,
            file_timeout_secs,
        }
    }

    /// Cache, persist, and restart for a non-empty form.
    pub async fn apply(&self, form: &FormFields) -> SettingsResult<UpdateOutcome> {
        if form.is_empty() {
            return Ok(UpdateOutcome::Skipped);
        }

        tracing::info!(fields = form.len(), "Saving user settings");
        let snapshot = build_snapshot(form, self.store.net64_port());
        let snapshot = self.store.update(Namespace::Net64, snapshot)?;

        let serialized = serde_json::to_vec(snapshot.as_ref())?;
        write_file(&self.settings_path, &serialized, self.file_timeout_secs).await?;
        tracing::info!(path = %self.settings_path.display(), "Net64 settings saved");

        self.supervisor.restart(&self.process_name).await?;
        Ok(UpdateOutcome::Applied(snapshot))
    }
}
