//! net64 settings endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup ─▶ lookup ─▶ settings store ◀─ loader (override | default)
//!                             │   ▲
//!                             ▼   │
//!   client ─▶ listener ─▶ pipeline ─▶ update ─▶ settings file ─▶ supervisor restart
//!                             │
//!                             ▼
//!                          renderer ─▶ HTML form / static asset
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use net64_settings::config::{load_or_default, ObservabilityConfig};
use net64_settings::lifecycle::{signals, Shutdown, StartupSequence};
use net64_settings::net::PublicAddressLookup;
use net64_settings::observability::init_logging;
use net64_settings::supervisor::{Pm2Supervisor, ProcessSupervisor};
use net64_settings::{SettingsServer, SettingsStore};

#[derive(Parser)]
#[command(name = "net64-settings")]
#[command(about = "Settings form and restart endpoint for a net64 server", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref());

    let observability = config
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    init_logging(&observability)?;

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        process = %config.supervisor.process_name,
        "net64-settings starting"
    );

    let store = SettingsStore::new();
    let supervisor: Arc<dyn ProcessSupervisor> =
        Arc::new(Pm2Supervisor::new(&config.supervisor, config.timeouts.supervisor_secs));
    let lookup = PublicAddressLookup::new(&config.lookup, config.timeouts.lookup_secs);

    let outcome = StartupSequence::new(config.clone(), store.clone(), supervisor.clone(), lookup)
        .run()
        .await;

    if let Some((step, e)) = outcome.report.halted {
        tracing::error!(step = ?step, error = %e, "Startup halted, not serving requests");
        return Err(e.into());
    }
    let Some(listener) = outcome.listener else {
        return Err("startup completed without a listener".into());
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let server = SettingsServer::new(&config, store, supervisor);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
