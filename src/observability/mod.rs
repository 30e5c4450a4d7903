//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Injectors report state transitions:
//!     → reporters.rs (TracingReporter, MetricsReporter, FanoutReporter)
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Injectors only know the `Reporter` trait; sinks live here
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod reporters;

pub use reporters::{FanoutReporter, MetricsReporter, TracingReporter};
