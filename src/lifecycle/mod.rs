//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build injectors → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → stop accepting → exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
