use bevy::{prelude::*, utils::HashMap};
use uuid::Uuid;

use crate::session::components::SessionId;

/// Opaque reference to a granted ability task, tied 1:1 to a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbilityGrantHandle(Uuid);

impl AbilityGrantHandle {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// The only place ability-framework resources are held. Sessions never talk
/// to the framework directly.
#[derive(Resource, Default)]
pub struct AbilityGrants {
    grants: HashMap<SessionId, AbilityGrantHandle>,
}

impl AbilityGrants {
    pub fn grant(&mut self, session: SessionId) -> AbilityGrantHandle {
        let handle = AbilityGrantHandle::new();
        self.grants.insert(session, handle);
        handle
    }

    /// Consumes the grant; a second take for the same session yields nothing,
    /// which is what makes release idempotent.
    pub fn take(&mut self, session: SessionId) -> Option<AbilityGrantHandle> {
        self.grants.remove(&session)
    }

    pub fn get(&self, session: SessionId) -> Option<AbilityGrantHandle> {
        self.grants.get(&session).copied()
    }

    pub fn sessions(&self) -> Vec<SessionId> {
        self.grants.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}
