//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     → lookup.rs (public address, best effort)
//!     → listener.rs (bind the form endpoint, last startup step)
//!     → Hand off to HTTP layer
//! ```

pub mod listener;
pub mod lookup;

pub use listener::{bind_listener, ListenerError};
pub use lookup::PublicAddressLookup;
