//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Connection slot held by a permit for the connection's lifetime

pub mod listener;

pub use listener::{ConnectionPermit, Listener, ListenerError};
