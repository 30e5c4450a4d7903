//! Run several injectors in a fixed order.

use std::sync::Arc;

use super::context::{tag_request, ContextTag};
use super::handler::Handler;
use super::reporter::Reporter;
use super::Injector;

/// Runs member injectors in sequence. Member 0 is outermost and runs first.
///
/// Each member decides on its own whether to continue into the rest of the
/// chain or short-circuit.
#[derive(Debug, Clone)]
pub struct ChainInjector {
    members: Vec<Arc<dyn Injector>>,
}

impl ChainInjector {
    pub fn new(members: impl IntoIterator<Item = Arc<dyn Injector>>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Injector for ChainInjector {
    fn name(&self) -> &'static str {
        "Chain Injector"
    }

    fn wrap(&self, next: Handler) -> Handler {
        // Fold from the back so the first member ends up outermost.
        let inner = self
            .members
            .iter()
            .rev()
            .fold(next, |next, member| member.wrap(next));

        Handler::new(move |mut req| {
            tag_request(&mut req, ContextTag::Chain);
            inner.handle(req)
        })
    }

    /// Members report through their own reporters; the chain emits nothing.
    fn set_reporter(&self, _reporter: Arc<dyn Reporter>) {}
}
