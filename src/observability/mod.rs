//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (request_id, path, step, error)
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every pipeline event
//! - Failures are logged where their policy is decided, not where they occur

pub mod logging;

pub use logging::init_logging;
