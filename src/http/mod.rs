//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → pipeline.rs (body → update → render, one response per request)
//!     → response.rs (headers, error page)
//!     → Send to client
//! ```

pub mod pipeline;
pub mod request;
pub mod response;
pub mod server;

pub use pipeline::{PipelineState, RequestContext, ResponseKind};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, SettingsServer};
