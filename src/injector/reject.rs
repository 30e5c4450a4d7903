//! Abort the connection without producing a response.

use std::sync::Arc;

use super::handler::{Abort, Handler};
use super::reporter::{InjectorState, Reporter, ReporterSlot};
use super::Injector;

/// Tears the connection down with no status line, headers or body.
///
/// Reports `Started` and never `Finished`: there is no normal completion.
#[derive(Debug, Default)]
pub struct RejectInjector {
    reporter: ReporterSlot,
}

impl RejectInjector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Injector for RejectInjector {
    fn name(&self) -> &'static str {
        "Reject Injector"
    }

    fn wrap(&self, _next: Handler) -> Handler {
        let name = self.name();
        let reporter = self.reporter.clone();
        Handler::new(move |req| {
            let reporter = reporter.clone();
            async move {
                reporter.report(name, InjectorState::Started);
                tracing::debug!(path = %req.uri().path(), "Rejecting request");
                Err(Abort)
            }
        })
    }

    fn set_reporter(&self, reporter: Arc<dyn Reporter>) {
        self.reporter.set(reporter);
    }
}
