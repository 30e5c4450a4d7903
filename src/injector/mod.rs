//! Fault injection subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → outermost wrapped Handler
//!         → chain.rs  (members in order, outermost first)
//!         → random.rs (one member per request)
//!         → slow.rs   (delay, then continue)
//!         → error.rs  (status + canonical text, stop)
//!         → reject.rs (Abort, no response at all)
//!     → downstream Handler (at most once)
//! ```
//!
//! # Design Decisions
//! - Every injector is valid once constructed; `NoopInjector` is the explicit
//!   disabled variant
//! - `wrap` is pure: effects happen only when the returned handler runs
//! - Combinators only see `dyn Injector`, so nesting is unrestricted
//! - Aborts are a value (`Err(Abort)`), recognized by the hosting server
//! - Missing reporters are silent

pub mod chain;
pub mod context;
pub mod error;
pub mod handler;
pub mod layer;
pub mod noop;
pub mod random;
pub mod reject;
pub mod reporter;
pub mod slow;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

pub use chain::ChainInjector;
pub use context::{ContextTag, InjectorTrail};
pub use error::ErrorInjector;
pub use handler::{Abort, Handler, HandlerResult};
pub use layer::InjectorLayer;
pub use noop::NoopInjector;
pub use random::{RandomInjector, DEFAULT_RAND_SEED};
pub use reject::RejectInjector;
pub use reporter::{InjectorState, Reporter};
pub use slow::SlowInjector;

/// A fault behavior that can be wrapped around a request handler.
pub trait Injector: Send + Sync + fmt::Debug {
    /// Stable display name used for instrumentation.
    fn name(&self) -> &'static str;

    /// Build a handler embedding this fault in front of `next`.
    fn wrap(&self, next: Handler) -> Handler;

    /// Attach a reporter, replacing any previous one. Handlers already
    /// produced by `wrap` observe the change.
    fn set_reporter(&self, reporter: Arc<dyn Reporter>);
}
