//! Ready-made [`Reporter`] implementations.

use std::sync::Arc;

use crate::injector::{InjectorState, Reporter};
use crate::observability::metrics;

/// Logs every state transition at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, source: &str, state: InjectorState) {
        tracing::info!(injector = source, state = %state, "Injector state changed");
    }
}

/// Counts state transitions in `fault_injector_events_total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsReporter;

impl Reporter for MetricsReporter {
    fn report(&self, source: &str, state: InjectorState) {
        metrics::record_injector_state(source, state);
    }
}

/// Forwards every event to each of its reporters, in order.
#[derive(Clone, Default)]
pub struct FanoutReporter {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl FanoutReporter {
    pub fn new(reporters: Vec<Arc<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for FanoutReporter {
    fn report(&self, source: &str, state: InjectorState) {
        for reporter in &self.reporters {
            reporter.report(source, state);
        }
    }
}
