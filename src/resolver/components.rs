use bevy::prelude::*;

use crate::{registry::components::TagSet, values::DEFAULT_MAX_CANDIDATES};

/// Marks an actor that scans for interactables every tick. `capabilities`
/// filters targets by tag intersection; an empty set matches everything.
#[derive(Component, Debug, Clone)]
pub struct InteractionSource {
    pub range: f32,
    pub capabilities: TagSet,
    pub max_candidates: usize,
}

impl InteractionSource {
    pub fn new(range: f32) -> Self {
        Self {
            range,
            capabilities: TagSet::default(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_capabilities(mut self, capabilities: TagSet) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }
}

/// Transient pairing of the scanning actor and one eligible target. Lives
/// only inside the per-tick `CandidateList`; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionCandidate {
    pub target: Entity,
    pub score: f32,
}

/// Ranked, truncated output of the last resolve pass, best candidate first.
#[derive(Component, Debug, Default)]
pub struct CandidateList(pub Vec<InteractionCandidate>);

impl CandidateList {
    pub fn top(&self) -> Option<Entity> {
        self.0.first().map(|candidate| candidate.target)
    }
}
