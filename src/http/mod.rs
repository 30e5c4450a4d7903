//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::Listener)
//!     → server.rs (hyper auto builder, HTTP/1.1 + HTTP/2)
//!     → current injector tree (swapped on reload)
//!     → downstream.rs (echo router or upstream forwarder)
//!     → Send to client, or close the connection on abort
//! ```

pub mod downstream;
pub mod server;

pub use downstream::{build_downstream, echo_router, upstream_router, EchoResponse};
pub use server::{FaultServer, ServerError};
