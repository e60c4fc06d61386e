use bevy::prelude::*;

use crate::{
    errors::CancelReason,
    session::{
        components::{SessionOutcome, SessionState},
        resources::SessionStore,
    },
    spatial::components::Position,
};

use super::{components::Interactable, resources::InteractableRegistry};

/// Deregistration force-cancels any live session referencing the entry before
/// the session tick runs, so the cancel lands in the same evaluation step.
pub fn deregister_removed(
    mut registry: ResMut<InteractableRegistry>,
    mut sessions: ResMut<SessionStore>,
    mut removed: RemovedComponents<Interactable>,
    time: Res<Time>,
) {
    for entity in removed.iter() {
        if registry.deregister(entity).is_none() {
            continue;
        }

        for id in sessions.live_sessions_for_target(entity) {
            sessions.transition(
                id,
                SessionState::Cancelled,
                Some(SessionOutcome::Cancelled(CancelReason::TargetRemoved)),
                time.elapsed_seconds(),
            );

            debug!("session {id} cancelled: target {entity:?} deregistered");
        }
    }
}

pub fn register_added(
    mut registry: ResMut<InteractableRegistry>,
    added: Query<(Entity, &Interactable, &Position), Added<Interactable>>,
) {
    for (entity, interactable, position) in added.iter() {
        if let Err(err) = registry.register(entity, interactable.0.clone(), position.0) {
            warn!("could not register {entity:?}: {err}");
        }
    }
}

pub fn sync_positions(
    mut registry: ResMut<InteractableRegistry>,
    moved: Query<(Entity, &Position), (With<Interactable>, Changed<Position>)>,
) {
    for (entity, position) in moved.iter() {
        registry.update_position(entity, position.0);
    }
}
