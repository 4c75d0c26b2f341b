//! Startup orchestration.
//!
//! # Responsibilities
//! - Run the startup steps in order, each awaiting the previous one
//! - Apply each step's failure policy from a single table
//! - Hand the bound listener to the caller once every step has run
//!
//! # Design Decisions
//! - Passive steps log and continue; aggressive steps halt the sequence
//! - No retries: a halted startup is left to the operator or outer supervisor
//! - The listener is bound last, so traffic only arrives once settings are cached

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::{SettingsError, SettingsResult};
use crate::net::{bind_listener, PublicAddressLookup};
use crate::settings::{load_manager_settings, load_net64_settings, Namespace, SettingsStore};
use crate::supervisor::ProcessSupervisor;

/// One stage of the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    LoadManagerSettings,
    LoadNet64Settings,
    StartManagedProcess,
    StartListener,
}

/// What a failure of a step does to the rest of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Log and continue.
    Passive,
    /// Log and stop; later steps never run.
    Aggressive,
}

/// The startup sequence, in execution order.
pub const STARTUP_PLAN: [(StartupStep, StepPolicy); 4] = [
    (StartupStep::LoadManagerSettings, StepPolicy::Passive),
    (StartupStep::LoadNet64Settings, StepPolicy::Aggressive),
    (StartupStep::StartManagedProcess, StepPolicy::Aggressive),
    (StartupStep::StartListener, StepPolicy::Aggressive),
];

/// Executes individual startup steps.
#[async_trait]
pub trait StepRunner: Send {
    async fn run_step(&mut self, step: StartupStep) -> SettingsResult<()>;
}

/// What happened while running a plan.
#[derive(Debug, Default)]
pub struct StartupReport {
    /// Steps that succeeded, in order.
    pub completed: Vec<StartupStep>,
    /// Passive steps that failed, with the logged reason.
    pub passive_failures: Vec<(StartupStep, String)>,
    /// The aggressive failure that stopped the sequence, if any.
    pub halted: Option<(StartupStep, SettingsError)>,
}

impl StartupReport {
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }
}

/// Run `plan` in order against `runner`.
pub async fn run_plan<R: StepRunner + ?Sized>(
    plan: &[(StartupStep, StepPolicy)],
    runner: &mut R,
) -> StartupReport {
    let mut report = StartupReport::default();

    for &(step, policy) in plan {
        tracing::info!(step = ?step, "Startup step");
        match runner.run_step(step).await {
            Ok(()) => report.completed.push(step),
            Err(e) => match policy {
                StepPolicy::Passive => {
                    tracing::warn!(step = ?step, error = %e, "Passive error, continuing startup");
                    report.passive_failures.push((step, e.to_string()));
                }
                StepPolicy::Aggressive => {
                    tracing::error!(step = ?step, error = %e, "Aggressive error, startup halted");
                    report.halted = Some((step, e));
                    break;
                }
            },
        }
    }

    report
}

/// Result of the real startup sequence.
#[derive(Debug)]
pub struct StartupOutcome {
    pub report: StartupReport,
    /// Bound listener, present only when every aggressive step succeeded.
    pub listener: Option<TcpListener>,
}

/// The production startup sequence.
pub struct StartupSequence {
    config: AppConfig,
    store: SettingsStore,
    supervisor: Arc<dyn ProcessSupervisor>,
    lookup: PublicAddressLookup,
    listener: Option<TcpListener>,
}

impl StartupSequence {
    pub fn new(
        config: AppConfig,
        store: SettingsStore,
        supervisor: Arc<dyn ProcessSupervisor>,
        lookup: PublicAddressLookup,
    ) -> Self {
        Self {
            config,
            store,
            supervisor,
            lookup,
            listener: None,
        }
    }

    /// Run [`STARTUP_PLAN`].
    pub async fn run(mut self) -> StartupOutcome {
        let report = run_plan(&STARTUP_PLAN, &mut self).await;
        let listener = if report.is_halted() { None } else { self.listener.take() };
        StartupOutcome { report, listener }
    }
}

#[async_trait]
impl StepRunner for StartupSequence {
    async fn run_step(&mut self, step: StartupStep) -> SettingsResult<()> {
        match step {
            StartupStep::LoadManagerSettings => {
                let snapshot = load_manager_settings(&self.lookup).await?;
                self.store.update(Namespace::Manager, snapshot)?;
            }
            StartupStep::LoadNet64Settings => {
                let snapshot = load_net64_settings(&self.config.paths, &self.config.timeouts).await?;
                self.store.update(Namespace::Net64, snapshot)?;
            }
            StartupStep::StartManagedProcess => {
                self.supervisor
                    .start(&self.config.supervisor.process_name, &self.config.supervisor.process_path)
                    .await?;
            }
            StartupStep::StartListener => {
                self.listener = Some(bind_listener(&self.config.listener).await?);
            }
        }
        Ok(())
    }
}
