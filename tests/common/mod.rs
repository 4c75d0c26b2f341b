//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use net64_settings::config::AppConfig;
use net64_settings::supervisor::ProcessSupervisor;
use net64_settings::{SettingsError, SettingsResult, SettingsServer, SettingsStore, Shutdown};

pub const TEMPLATE: &str = "<!DOCTYPE html><html><body>\
<p>${publicIp}</p>\
<input name=\"name\" value=\"${name}\">\
<input name=\"domain\" value=\"${domain}\">\
<select name=\"enableWebHook\">\
<option value=\"true\" ${enableWebHook:true}>On</option>\
<option value=\"false\" ${enableWebHook:false}>Off</option>\
</select></body></html>";

pub const STYLESHEET: &str = "body { background: #222; }\n";
pub const SCRIPT: &str = "document.forms[0].reset();\n";

/// Start a mock HTTP backend that answers every request with `status` and `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A supervisor call observed by [`RecordingSupervisor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCall {
    Start { name: String, path: PathBuf },
    Restart { name: String },
    List,
}

/// Supervisor double that records calls and fails on request.
#[derive(Default)]
pub struct RecordingSupervisor {
    pub calls: Mutex<Vec<SupervisorCall>>,
    pub fail_start: bool,
    pub fail_restart: bool,
    pub listing: String,
}

impl RecordingSupervisor {
    pub fn calls(&self) -> Vec<SupervisorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn restart_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SupervisorCall::Restart { .. }))
            .count()
    }
}

#[async_trait]
impl ProcessSupervisor for RecordingSupervisor {
    async fn start(&self, name: &str, path: &Path) -> SettingsResult<()> {
        self.calls.lock().unwrap().push(SupervisorCall::Start {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
        if self.fail_start {
            return Err(SettingsError::ProcessControl("pm2 start exited with 1".into()));
        }
        Ok(())
    }

    async fn restart(&self, name: &str) -> SettingsResult<()> {
        self.calls.lock().unwrap().push(SupervisorCall::Restart {
            name: name.to_string(),
        });
        if self.fail_restart {
            return Err(SettingsError::ProcessControl("pm2 restart exited with 1".into()));
        }
        Ok(())
    }

    async fn list(&self) -> SettingsResult<String> {
        self.calls.lock().unwrap().push(SupervisorCall::List);
        Ok(self.listing.clone())
    }
}

/// Scratch directory laid out like an install: template, assets, settings.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dist").join("css")).unwrap();
        std::fs::create_dir_all(dir.path().join("overrides")).unwrap();
        std::fs::write(dir.path().join("dist").join("settings.html"), TEMPLATE).unwrap();
        std::fs::write(dir.path().join("dist").join("css").join("style.css"), STYLESHEET).unwrap();
        std::fs::write(dir.path().join("dist").join("app.js"), SCRIPT).unwrap();
        Self { dir }
    }

    pub fn default_settings(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    pub fn override_settings(&self) -> PathBuf {
        self.dir.path().join("overrides").join("settings.json")
    }

    pub fn write_default(&self, json: &str) {
        std::fs::write(self.default_settings(), json).unwrap();
    }

    pub fn write_override(&self, json: &str) {
        std::fs::write(self.override_settings(), json).unwrap();
    }

    pub fn read_default(&self) -> serde_json::Value {
        serde_json::from_slice(&std::fs::read(self.default_settings()).unwrap()).unwrap()
    }

    /// Configuration pointing every path into this workspace.
    pub fn config(&self, lookup_addr: SocketAddr) -> AppConfig {
        let mut config = AppConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.paths.override_settings = self.override_settings();
        config.paths.default_settings = self.default_settings();
        config.paths.template = self.dir.path().join("dist").join("settings.html");
        config.paths.asset_root = self.dir.path().join("dist");
        config.lookup.url = format!("http://{}/json", lookup_addr);
        config.timeouts.lookup_secs = 2;
        config
    }
}

/// Serve `store` on an ephemeral port; returns its address and shutdown handle.
pub async fn spawn_server(
    config: &AppConfig,
    store: SettingsStore,
    supervisor: Arc<dyn ProcessSupervisor>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = SettingsServer::new(config, store, supervisor);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
