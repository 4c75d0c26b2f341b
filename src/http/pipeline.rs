//! Per-request pipeline.
//!
//! # State Machine
//! ```text
//! Start → BodyRead → UpdateAttempted → Rendered → Sent
//!   └──────────┴──────────┴──────────────┴──→ ErrorResponse
//! ```
//!
//! - Body read failures degrade to an empty body
//! - Update failures are logged and the page is still served
//! - Render failures become a 500 with the error detail
//!
//! Exactly one response is produced per request, and at most one
//! persist-and-restart cycle runs (only for a non-empty body).

use std::path::{Component, Path, PathBuf};

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;

use crate::error::{SettingsError, SettingsResult};
use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::resilience::timeouts::read_bytes;
use crate::settings::{FormFields, UpdateOutcome};
use crate::template::render_settings_form;

/// Largest request body read as a form.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

/// What kind of document the request path asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Html,
    Css,
    Js,
}

impl ResponseKind {
    /// Classify by the extension after the last `.` of the path.
    pub fn from_path(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default();
        match path.rsplit('.').next() {
            Some("css") => ResponseKind::Css,
            Some("js") => ResponseKind::Js,
            _ => ResponseKind::Html,
        }
    }
}

/// Pipeline stage reached by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    BodyRead,
    UpdateAttempted,
    Rendered,
    Sent,
    ErrorResponse,
}

/// Everything known about one request while it moves through the pipeline.
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub body: FormFields,
    pub kind: ResponseKind,
    pub headers: HeaderMap,
    pub content: Vec<u8>,
    state: PipelineState,
}

impl RequestContext {
    fn new(request_id: String, path: String) -> Self {
        let kind = ResponseKind::from_path(&path);
        Self {
            request_id,
            path,
            body: FormFields::new(),
            kind,
            headers: HeaderMap::new(),
            content: Vec::new(),
            state: PipelineState::Start,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(
            request_id = %self.request_id,
            from = ?self.state,
            to = ?next,
            "Pipeline transition"
        );
        self.state = next;
    }
}

/// Run one request through every stage and produce its response.
pub async fn handle(state: &AppState, request: Request<Body>) -> Response {
    let mut ctx = start_request(request).await;
    process_request(state, &mut ctx).await;

    match create_response(state, &mut ctx).await {
        Ok(()) => end_request(ctx),
        Err(e) => {
            tracing::error!(request_id = %ctx.request_id, path = %ctx.path, error = %e, "Response failed");
            ctx.transition(PipelineState::ErrorResponse);
            response::error_response(&e.to_string())
        }
    }
}

/// Start → BodyRead: classify the path and decode any form body.
async fn start_request(request: Request<Body>) -> RequestContext {
    let (parts, body) = request.into_parts();
    let mut ctx = RequestContext::new(request_id(&parts.headers), parts.uri.path().to_string());

    tracing::debug!(
        request_id = %ctx.request_id,
        method = %parts.method,
        path = %ctx.path,
        kind = ?ctx.kind,
        "Starting request"
    );

    match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) if !bytes.is_empty() => ctx.body = parse_form(&bytes),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, error = %e, "Body read failed, continuing without body");
        }
    }

    ctx.transition(PipelineState::BodyRead);
    ctx
}

/// BodyRead → UpdateAttempted: failures here never fail the request.
async fn process_request(state: &AppState, ctx: &mut RequestContext) {
    match state.updater.apply(&ctx.body).await {
        Ok(UpdateOutcome::Skipped) => {}
        Ok(UpdateOutcome::Applied(_)) => {
            tracing::info!(request_id = %ctx.request_id, "Settings updated");
        }
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, error = %e, "Settings update failed, serving page anyway");
        }
    }
    ctx.transition(PipelineState::UpdateAttempted);
}

/// UpdateAttempted → Rendered.
async fn create_response(state: &AppState, ctx: &mut RequestContext) -> SettingsResult<()> {
    match ctx.kind {
        ResponseKind::Html => {
            ctx.headers = response::html_headers();
            ctx.content = render_settings_form(&state.paths.template, &state.store, state.file_timeout_secs)
                .await?
                .into_bytes();
        }
        ResponseKind::Css => {
            ctx.headers = response::asset_headers("text/css");
            ctx.content = read_asset(state, &ctx.path).await?;
        }
        ResponseKind::Js => {
            ctx.headers = response::asset_headers(&state.http.js_content_type);
            ctx.content = read_asset(state, &ctx.path).await?;
        }
    }
    ctx.transition(PipelineState::Rendered);
    Ok(())
}

/// Rendered → Sent.
fn end_request(mut ctx: RequestContext) -> Response {
    ctx.transition(PipelineState::Sent);
    let headers = std::mem::take(&mut ctx.headers);
    let content = std::mem::take(&mut ctx.content);
    response::build(StatusCode::OK, headers, content)
}

async fn read_asset(state: &AppState, request_path: &str) -> SettingsResult<Vec<u8>> {
    let path = asset_path(&state.paths.asset_root, request_path)?;
    read_bytes(&path, state.file_timeout_secs)
        .await
        .map_err(|e| SettingsError::Render(e.to_string()))
}

/// Resolve a request path under the asset root.
pub fn asset_path(root: &Path, request_path: &str) -> SettingsResult<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(SettingsError::Render(format!(
            "asset path '{}' escapes the asset root",
            request_path
        )));
    }
    Ok(root.join(relative))
}

/// Decode an `application/x-www-form-urlencoded` body; later duplicates win.
pub fn parse_form(bytes: &[u8]) -> FormFields {
    url::form_urlencoded::parse(bytes).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_kind_from_extension() {
        assert_eq!(ResponseKind::from_path("/style.css"), ResponseKind::Css);
        assert_eq!(ResponseKind::from_path("/js/app.js"), ResponseKind::Js);
        assert_eq!(ResponseKind::from_path("/"), ResponseKind::Html);
        assert_eq!(ResponseKind::from_path("/index.html"), ResponseKind::Html);
        assert_eq!(ResponseKind::from_path("/settings"), ResponseKind::Html);
        assert_eq!(ResponseKind::from_path("/v1.css/page"), ResponseKind::Html);
        assert_eq!(ResponseKind::from_path("/style.css?v=2"), ResponseKind::Css);
    }

    #[test]
    fn test_parse_form_decodes_fields() {
        let form = parse_form(b"name=My+Lobby&description=caf%C3%A9&enableWebHook=true");
        assert_eq!(form["name"], "My Lobby");
        assert_eq!(form["description"], "café");
        assert_eq!(form["enableWebHook"], "true");
    }

    #[test]
    fn test_parse_form_last_duplicate_wins() {
        let form = parse_form(b"name=a&name=b");
        assert_eq!(form.len(), 1);
        assert_eq!(form["name"], "b");
    }

    #[test]
    fn test_asset_path_joins_under_root() {
        let path = asset_path(Path::new("/srv/dist"), "/css/style.css").unwrap();
        assert_eq!(path, PathBuf::from("/srv/dist/css/style.css"));
    }

    #[test]
    fn test_asset_path_rejects_traversal() {
        assert!(asset_path(Path::new("/srv/dist"), "/../etc/passwd.css").is_err());
        assert!(asset_path(Path::new("/srv/dist"), "/css/../../secret.js").is_err());
    }

    #[test]
    fn test_context_starts_in_start_state() {
        let ctx = RequestContext::new("id".into(), "/style.css".into());
        assert_eq!(ctx.state(), PipelineState::Start);
        assert_eq!(ctx.kind, ResponseKind::Css);
        assert!(ctx.body.is_empty());
    }
}
