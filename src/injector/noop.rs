//! Disabled injector.

use std::sync::Arc;

use super::handler::Handler;
use super::reporter::Reporter;
use super::Injector;

/// Returns the downstream handler unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInjector;

impl NoopInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Injector for NoopInjector {
    fn name(&self) -> &'static str {
        "Noop Injector"
    }

    fn wrap(&self, next: Handler) -> Handler {
        next
    }

    fn set_reporter(&self, _reporter: Arc<dyn Reporter>) {}
}
