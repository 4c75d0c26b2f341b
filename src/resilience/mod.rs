//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! External call (lookup, file IO, supervisor command):
//!     → timeouts.rs (enforce per-kind deadline)
//!     → On expiry: SettingsError::Timeout, handled by the caller's policy
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No automatic retries; the caller's error class decides what happens

pub mod timeouts;
