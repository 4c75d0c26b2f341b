//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler (every method, every path)
//! - Wire up middleware (request ID, tracing)
//! - Serve on a pre-bound listener until shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, HttpConfig, SettingsPaths};
use crate::http::pipeline;
use crate::http::request::UuidRequestId;
use crate::settings::{SettingsStore, SettingsUpdater};
use crate::supervisor::ProcessSupervisor;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SettingsStore,
    pub updater: Arc<SettingsUpdater>,
    pub paths: SettingsPaths,
    pub http: HttpConfig,
    pub file_timeout_secs: u64,
}

impl AppState {
    pub fn new(config: &AppConfig, store: SettingsStore, supervisor: Arc<dyn ProcessSupervisor>) -> Self {
        let updater = SettingsUpdater::new(
            store.clone(),
            supervisor,
            config.paths.default_settings.clone(),
            config.supervisor.process_name.clone(),
            config.timeouts.file_secs,
        );

        Self {
            store,
            updater: Arc::new(updater),
            paths: config.paths.clone(),
            http: config.http.clone(),
            file_timeout_secs: config.timeouts.file_secs,
        }
    }
}

/// HTTP server for the settings form.
pub struct SettingsServer {
    router: Router,
}

impl SettingsServer {
    /// Create a new server over the shared settings store.
    pub fn new(config: &AppConfig, store: SettingsStore, supervisor: Arc<dyn ProcessSupervisor>) -> Self {
        let state = AppState::new(config, store, supervisor);
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(settings_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Settings server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Settings server received shutdown signal");
            })
            .await?;

        tracing::info!("Settings server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request runs the full pipeline.
async fn settings_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    pipeline::handle(&state, request).await
}
