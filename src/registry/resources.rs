use bevy::{prelude::*, utils::HashMap};

use crate::{errors::InteractionError, session::components::SessionId};

use super::components::{InteractableDescriptor, TagSet};

/// Spherical slice of the world a query is bounded to.
#[derive(Debug, Clone, Copy)]
pub struct QueryRegion {
    pub center: Vec3,
    pub radius: f32,
}

impl QueryRegion {
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

#[derive(Debug)]
pub struct RegisteredInteractable {
    pub descriptor: InteractableDescriptor,
    pub position: Vec3,
    pub order: u64,
    claimed_by: Option<SessionId>,
}

impl RegisteredInteractable {
    pub fn claimant(&self) -> Option<SessionId> {
        self.claimed_by
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

/// Index of world objects currently accepting interaction, keyed by the
/// owning entity. Registration order is recorded for resolver tie-breaks.
#[derive(Resource, Default)]
pub struct InteractableRegistry {
    entries: HashMap<Entity, RegisteredInteractable>,
    next_order: u64,
}

impl InteractableRegistry {
    pub fn register(
        &mut self,
        entity: Entity,
        descriptor: InteractableDescriptor,
        position: Vec3,
    ) -> Result<(), InteractionError> {
        if self.entries.contains_key(&entity) {
            return Err(InteractionError::DuplicateIdentity);
        }

        let order = self.next_order;
        self.next_order += 1;

        self.entries.insert(
            entity,
            RegisteredInteractable {
                descriptor,
                position,
                order,
                claimed_by: None,
            },
        );

        Ok(())
    }

    pub fn deregister(&mut self, entity: Entity) -> Option<RegisteredInteractable> {
        self.entries.remove(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&RegisteredInteractable> {
        self.entries.get(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn update_position(&mut self, entity: Entity, position: Vec3) {
        if let Some(entry) = self.entries.get_mut(&entity) {
            entry.position = position;
        }
    }

    /// Entries intersecting `region` whose tags intersect `required` (an
    /// empty `required` set matches everything). The iteration is stable for
    /// the lifetime of one call; no ordering is guaranteed across calls.
    pub fn query<'a>(
        &'a self,
        region: QueryRegion,
        required: &'a TagSet,
    ) -> impl Iterator<Item = (Entity, &'a RegisteredInteractable)> + 'a {
        self.entries
            .iter()
            .filter(move |(_, entry)| {
                region.contains(entry.position)
                    && (required.is_empty() || entry.descriptor.tags().intersects(required))
            })
            .map(|(entity, entry)| (*entity, entry))
    }

    /// Occupancy claim as a single check-and-set: the first session to claim
    /// an exclusive entry wins, later claims fail with `TargetOccupied`.
    /// Shared entries always admit.
    pub fn try_claim(&mut self, entity: Entity, session: SessionId) -> Result<(), InteractionError> {
        let entry = self
            .entries
            .get_mut(&entity)
            .ok_or(InteractionError::TargetRemoved)?;

        if !entry.descriptor.is_exclusive() {
            return Ok(());
        }

        match entry.claimed_by {
            Some(existing) if existing != session => Err(InteractionError::TargetOccupied),
            _ => {
                entry.claimed_by = Some(session);
                Ok(())
            }
        }
    }

    /// Idempotent; only the claiming session releases the entry.
    pub fn release(&mut self, entity: Entity, session: SessionId) {
        if let Some(entry) = self.entries.get_mut(&entity) {
            if entry.claimed_by == Some(session) {
                entry.claimed_by = None;
            }
        }
    }
}
