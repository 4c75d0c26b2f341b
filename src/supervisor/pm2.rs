//! Supervisor backed by the pm2 command line.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::SupervisorConfig;
use crate::error::{SettingsError, SettingsResult};
use crate::resilience::timeouts::with_timeout;
use crate::supervisor::ProcessSupervisor;

/// Runs `<program> start|restart|list` for each supervisor operation.
#[derive(Debug, Clone)]
pub struct Pm2Supervisor {
    program: String,
    timeout_secs: u64,
}

impl Pm2Supervisor {
    pub fn new(config: &SupervisorConfig, timeout_secs: u64) -> Self {
        Self {
            program: config.program.clone(),
            timeout_secs,
        }
    }

    /// Run a prepared command, returning stdout on a zero exit status.
    async fn execute(&self, mut command: Command, action: &'static str) -> SettingsResult<String> {
        command.kill_on_drop(true);

        let output = with_timeout("supervisor command", self.timeout_secs, async {
            command.output().await.map_err(|e| {
                SettingsError::ProcessControl(format!("failed to run {} {}: {}", self.program, action, e))
            })
        })
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SettingsError::ProcessControl(format!(
                "{} {} exited with {}: {}",
                self.program,
                action,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ProcessSupervisor for Pm2Supervisor {
    async fn start(&self, name: &str, path: &Path) -> SettingsResult<()> {
        tracing::info!(process = name, path = %path.display(), "Starting managed process");
        let mut command = Command::new(&self.program);
        command.arg("start").arg(path).arg(format!("--name={}", name));
        self.execute(command, "start").await.map(|_| ())
    }

    async fn restart(&self, name: &str) -> SettingsResult<()> {
        tracing::info!(process = name, "Restarting managed process");
        let mut command = Command::new(&self.program);
        command.arg("restart").arg(name);
        self.execute(command, "restart").await.map(|_| ())
    }

    async fn list(&self) -> SettingsResult<String> {
        let mut command = Command::new(&self.program);
        command.arg("list");
        self.execute(command, "list").await
    }
}
