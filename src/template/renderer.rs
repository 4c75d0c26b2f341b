//! Placeholder substitution for the settings form.
//!
//! Two token families are recognised:
//! - `${key}` is replaced by the value's text
//! - `${key:true}` / `${key:false}` become `selected` or empty, for boolean values
//!
//! Rules are computed from the snapshots first and then applied to the
//! document in one pass, so no rule ever sees another rule's output.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{SettingsError, SettingsResult};
use crate::resilience::timeouts::read_file;
use crate::settings::{Namespace, SettingsStore, Snapshot};

/// Marker emitted for the active option of a boolean toggle.
pub const SELECTED: &str = "selected";

const TOKEN_OPEN: &str = "${";

/// Replace every occurrence of `token` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub token: String,
    pub replacement: String,
}

impl SubstitutionRule {
    fn new(token: String, replacement: impl Into<String>) -> Self {
        Self {
            token,
            replacement: replacement.into(),
        }
    }
}

/// Rules for a namespace whose values are always plain text.
pub fn plain_rules(snapshot: &Snapshot) -> Vec<SubstitutionRule> {
    snapshot
        .iter()
        .map(|(key, value)| SubstitutionRule::new(format!("${{{}}}", key), value_text(value)))
        .collect()
}

/// Rules for a namespace where booleans drive `:true`/`:false` toggles.
pub fn toggle_rules(snapshot: &Snapshot) -> Vec<SubstitutionRule> {
    let mut rules = Vec::with_capacity(snapshot.len());
    for (key, value) in snapshot {
        match value {
            Value::Bool(enabled) => {
                let (on, off) = if *enabled { (SELECTED, "") } else { ("", SELECTED) };
                rules.push(SubstitutionRule::new(format!("${{{}:true}}", key), on));
                rules.push(SubstitutionRule::new(format!("${{{}:false}}", key), off));
            }
            other => rules.push(SubstitutionRule::new(format!("${{{}}}", key), value_text(other))),
        }
    }
    rules
}

/// Rules for everything currently cached; absent namespaces contribute none.
pub fn rules_for(store: &SettingsStore) -> Vec<SubstitutionRule> {
    let mut rules = Vec::new();
    if let Some(manager) = store.get(Namespace::Manager) {
        rules.extend(plain_rules(&manager));
    }
    if let Some(net64) = store.get(Namespace::Net64) {
        rules.extend(toggle_rules(&net64));
    }
    rules
}

/// Apply `rules` to `document` in a single left-to-right pass.
///
/// Replacement text is written straight to the output and never scanned
/// again, so a value that itself contains `${...}` is emitted literally.
pub fn apply_rules(document: &str, rules: &[SubstitutionRule]) -> String {
    let mut table: HashMap<&str, &str> = HashMap::with_capacity(rules.len());
    for rule in rules {
        // first rule for a token wins
        table.entry(rule.token.as_str()).or_insert(rule.replacement.as_str());
    }

    let mut out = String::with_capacity(document.len());
    let mut rest = document;
    while let Some(start) = rest.find(TOKEN_OPEN) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let known = candidate
            .find('}')
            .map(|end| &candidate[..=end])
            .and_then(|token| table.get(token).map(|replacement| (token.len(), *replacement)));
        match known {
            Some((consumed, replacement)) => {
                out.push_str(replacement);
                rest = &candidate[consumed..];
            }
            None => {
                out.push_str(TOKEN_OPEN);
                rest = &candidate[TOKEN_OPEN.len()..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render `document` against the cached settings.
pub fn render(document: &str, store: &SettingsStore) -> String {
    apply_rules(document, &rules_for(store))
}

/// Read the form template and render it.
pub async fn render_settings_form(
    template: &Path,
    store: &SettingsStore,
    file_timeout_secs: u64,
) -> SettingsResult<String> {
    tracing::debug!(template = %template.display(), "Getting settings form");
    let document = read_file(template, file_timeout_secs)
        .await
        .map_err(|e| SettingsError::Render(e.to_string()))?;
    Ok(render(&document, store))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
