//! `tower::Layer` adapter for injectors.

use std::fmt;
use std::sync::Arc;

use tower::Layer;

use super::handler::Handler;
use super::Injector;

/// Applies an injector to a [`Handler`] inside a `tower::ServiceBuilder`.
///
/// Layers added first end up outermost, the same order a
/// [`ChainInjector`](super::ChainInjector) uses.
#[derive(Clone)]
pub struct InjectorLayer {
    injector: Arc<dyn Injector>,
}

impl InjectorLayer {
    pub fn new(injector: Arc<dyn Injector>) -> Self {
        Self { injector }
    }
}

impl fmt::Debug for InjectorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorLayer")
            .field("injector", &self.injector.name())
            .finish()
    }
}

impl Layer<Handler> for InjectorLayer {
    type Service = Handler;

    fn layer(&self, inner: Handler) -> Handler {
        self.injector.wrap(inner)
    }
}
