//! Run exactly one of several injectors, chosen uniformly per request.

use std::fmt;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::context::{tag_request, ContextTag};
use super::handler::Handler;
use super::reporter::Reporter;
use super::Injector;

/// Seed used unless one is supplied, so selections are reproducible.
pub const DEFAULT_RAND_SEED: u64 = 1;

/// Runs one uniformly chosen member per request; the others are skipped
/// entirely.
///
/// The generator is shared by every handler this injector produced and is
/// locked only for the draw, never across the downstream call.
pub struct RandomInjector {
    members: Vec<Arc<dyn Injector>>,
    rng: Arc<Mutex<StdRng>>,
}

impl RandomInjector {
    pub fn new(members: impl IntoIterator<Item = Arc<dyn Injector>>) -> Self {
        Self::with_seed(members, DEFAULT_RAND_SEED)
    }

    pub fn with_seed(members: impl IntoIterator<Item = Arc<dyn Injector>>, seed: u64) -> Self {
        Self {
            members: members.into_iter().collect(),
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Replace the generator. Call before traffic starts; draws already in
    /// flight may observe either generator.
    pub fn set_seed(&self, seed: u64) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *rng = StdRng::seed_from_u64(seed);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn draw(rng: &Mutex<StdRng>, len: usize) -> usize {
    rng.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .gen_range(0..len)
}

impl fmt::Debug for RandomInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomInjector")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

impl Injector for RandomInjector {
    fn name(&self) -> &'static str {
        "Random Injector"
    }

    fn wrap(&self, next: Handler) -> Handler {
        if self.members.is_empty() {
            return next;
        }

        let wrapped: Arc<[Handler]> = self
            .members
            .iter()
            .map(|member| member.wrap(next.clone()))
            .collect();
        let rng = self.rng.clone();

        Handler::new(move |mut req| {
            let index = draw(&rng, wrapped.len());
            tracing::trace!(index, members = wrapped.len(), "Random injector selected member");
            tag_request(&mut req, ContextTag::Random);
            wrapped[index].handle(req)
        })
    }

    /// Members report through their own reporters; the random injector
    /// emits nothing.
    fn set_reporter(&self, _reporter: Arc<dyn Reporter>) {}
}
