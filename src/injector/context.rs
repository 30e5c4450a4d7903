//! Request-context tags recording which injector paths a request took.
//!
//! Tags live in the request extensions as an [`InjectorTrail`]. They are
//! meant for assertions and diagnostics and never change the response.

use std::fmt;

use axum::http::Request;

/// Marker for one injector path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTag {
    Chain,
    Random,
    SlowApplied,
    SlowSkipped,
}

impl ContextTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTag::Chain => "chain",
            ContextTag::Random => "random",
            ContextTag::SlowApplied => "slow-applied",
            ContextTag::SlowSkipped => "slow-skipped",
        }
    }
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags applied to a request, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorTrail {
    tags: Vec<ContextTag>,
}

impl InjectorTrail {
    /// The trail attached to a request, if any injector tagged it.
    pub fn of<B>(req: &Request<B>) -> Option<&InjectorTrail> {
        req.extensions().get::<InjectorTrail>()
    }

    pub fn tags(&self) -> &[ContextTag] {
        &self.tags
    }

    /// The most recently applied tag.
    pub fn latest(&self) -> Option<ContextTag> {
        self.tags.last().copied()
    }

    pub fn contains(&self, tag: ContextTag) -> bool {
        self.tags.contains(&tag)
    }
}

pub(crate) fn tag_request<B>(req: &mut Request<B>, tag: ContextTag) {
    let extensions = req.extensions_mut();
    if let Some(trail) = extensions.get_mut::<InjectorTrail>() {
        trail.tags.push(tag);
        return;
    }
    extensions.insert(InjectorTrail { tags: vec![tag] });
}
