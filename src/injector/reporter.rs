//! Observer boundary for injector state transitions.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Lifecycle marker emitted to a [`Reporter`] for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectorState {
    Started,
    Finished,
    /// Reserved for gates that decide not to run an injector at all.
    Skipped,
}

impl InjectorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectorState::Started => "started",
            InjectorState::Finished => "finished",
            InjectorState::Skipped => "skipped",
        }
    }
}

impl fmt::Display for InjectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink receiving `(source, state)` pairs from injectors.
pub trait Reporter: Send + Sync {
    fn report(&self, source: &str, state: InjectorState);
}

/// Observer slot shared between an injector and every handler it produced.
///
/// Replacing the reporter is visible to handlers that were already wrapped.
/// An empty slot makes `report` a no-op.
#[derive(Clone, Default)]
pub(crate) struct ReporterSlot {
    inner: Arc<ArcSwapOption<Arc<dyn Reporter>>>,
}

impl ReporterSlot {
    pub(crate) fn set(&self, reporter: Arc<dyn Reporter>) {
        self.inner.store(Some(Arc::new(reporter)));
    }

    pub(crate) fn report(&self, source: &str, state: InjectorState) {
        if let Some(reporter) = &*self.inner.load() {
            reporter.report(source, state);
        }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl fmt::Debug for ReporterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}
