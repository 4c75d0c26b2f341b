//! Startup sequence against real files, a mock lookup service, and a recording supervisor.

use std::sync::Arc;

use serde_json::json;

use net64_settings::lifecycle::{StartupSequence, StartupStep};
use net64_settings::net::PublicAddressLookup;
use net64_settings::settings::Namespace;
use net64_settings::{SettingsError, SettingsStore};

mod common;

use common::{RecordingSupervisor, SupervisorCall, Workspace};

async fn run_startup(
    workspace: &Workspace,
    lookup_addr: std::net::SocketAddr,
    supervisor: Arc<RecordingSupervisor>,
) -> (net64_settings::lifecycle::StartupOutcome, SettingsStore) {
    let config = workspace.config(lookup_addr);
    let store = SettingsStore::new();
    let lookup = PublicAddressLookup::new(&config.lookup, config.timeouts.lookup_secs);
    let outcome = StartupSequence::new(config, store.clone(), supervisor, lookup)
        .run()
        .await;
    (outcome, store)
}

#[tokio::test]
async fn test_full_startup_caches_both_namespaces() {
    let lookup = common::start_mock_backend(200, r#"{"status":"success","query":"203.0.113.50"}"#).await;
    let workspace = Workspace::new();
    workspace.write_default(r#"{"port":3678,"name":"Default","enableWebHook":false}"#);
    let supervisor = Arc::new(RecordingSupervisor::default());

    let (outcome, store) = run_startup(&workspace, lookup, supervisor.clone()).await;

    assert!(!outcome.report.is_halted());
    assert!(outcome.report.passive_failures.is_empty());
    assert!(outcome.listener.is_some());

    let manager = store.get(Namespace::Manager).unwrap();
    assert_eq!(manager.get("publicIp"), Some(&json!("203.0.113.50")));
    let net64 = store.get(Namespace::Net64).unwrap();
    assert_eq!(net64.get("name"), Some(&json!("Default")));

    let calls = supervisor.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], SupervisorCall::Start { name, .. } if name == "net64"));
}

#[tokio::test]
async fn test_override_precedes_default() {
    let lookup = common::start_mock_backend(200, r#"{"query":"203.0.113.50"}"#).await;
    let workspace = Workspace::new();
    workspace.write_default(r#"{"port":3678,"name":"Default"}"#);
    workspace.write_override(r#"{"port":4000,"name":"Override"}"#);

    let (outcome, store) = run_startup(&workspace, lookup, Arc::new(RecordingSupervisor::default())).await;

    assert!(!outcome.report.is_halted());
    let net64 = store.get(Namespace::Net64).unwrap();
    assert_eq!(net64.get("name"), Some(&json!("Override")));
    assert_eq!(net64.get("port"), Some(&json!(4000)));
    assert_eq!(workspace.read_default(), json!({"port": 4000, "name": "Override"}));
}

#[tokio::test]
async fn test_lookup_failure_is_passive() {
    let lookup = common::closed_addr().await;
    let workspace = Workspace::new();
    workspace.write_default(r#"{"port":3678}"#);

    let (outcome, store) = run_startup(&workspace, lookup, Arc::new(RecordingSupervisor::default())).await;

    assert!(!outcome.report.is_halted());
    assert_eq!(outcome.report.passive_failures.len(), 1);
    assert_eq!(outcome.report.passive_failures[0].0, StartupStep::LoadManagerSettings);
    assert!(store.get(Namespace::Manager).is_none());
    assert!(store.get(Namespace::Net64).is_some());
    assert!(outcome.listener.is_some());
}

#[tokio::test]
async fn test_empty_lookup_body_is_passive() {
    let lookup = common::start_mock_backend(200, "").await;
    let workspace = Workspace::new();
    workspace.write_default(r#"{"port":3678}"#);

    let (outcome, store) = run_startup(&workspace, lookup, Arc::new(RecordingSupervisor::default())).await;

    assert_eq!(outcome.report.passive_failures.len(), 1);
    assert!(outcome.report.passive_failures[0].1.contains("No data returned"));
    assert!(store.get(Namespace::Manager).is_none());
    assert!(outcome.listener.is_some());
}

#[tokio::test]
async fn test_missing_settings_halts_before_process_start() {
    let lookup = common::start_mock_backend(200, r#"{"query":"203.0.113.50"}"#).await;
    let workspace = Workspace::new();
    let supervisor = Arc::new(RecordingSupervisor::default());

    let (outcome, store) = run_startup(&workspace, lookup, supervisor.clone()).await;

    assert!(matches!(
        outcome.report.halted,
        Some((StartupStep::LoadNet64Settings, SettingsError::Io { .. }))
    ));
    assert!(outcome.listener.is_none());
    assert!(store.get(Namespace::Net64).is_none());
    assert!(supervisor.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_settings_halts() {
    let lookup = common::start_mock_backend(200, r#"{"query":"203.0.113.50"}"#).await;
    let workspace = Workspace::new();
    workspace.write_default("{ not json");

    let (outcome, _) = run_startup(&workspace, lookup, Arc::new(RecordingSupervisor::default())).await;

    assert!(matches!(
        outcome.report.halted,
        Some((StartupStep::LoadNet64Settings, SettingsError::Parse(_)))
    ));
    assert!(outcome.listener.is_none());
}

#[tokio::test]
async fn test_process_start_failure_halts_before_listener() {
    let lookup = common::start_mock_backend(200, r#"{"query":"203.0.113.50"}"#).await;
    let workspace = Workspace::new();
    workspace.write_default(r#"{"port":3678}"#);
    let supervisor = Arc::new(RecordingSupervisor {
        fail_start: true,
        ..RecordingSupervisor::default()
    });

    let (outcome, _) = run_startup(&workspace, lookup, supervisor).await;

    assert!(matches!(
        outcome.report.halted,
        Some((StartupStep::StartManagedProcess, SettingsError::ProcessControl(_)))
    ));
    assert!(!outcome.report.completed.contains(&StartupStep::StartListener));
    assert!(outcome.listener.is_none());
}
