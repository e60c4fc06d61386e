use std::time::Duration;

use bevy::prelude::*;

use crate::{
    ability::events::AbilityCallback,
    errors::{CancelReason, InteractionError},
    replication::{
        events::{InboundSessionUpdate, SessionUpdate},
        resources::{PeerId, ReplicationPeers},
    },
    session::{
        components::{EffectPayload, SessionId, SessionState},
        events::{InteractCancel, InteractHold, InteractRequest},
        resources::SessionStore,
    },
};

/// Moves the manually-driven clock forward. The next `app.update()` sees the
/// new elapsed time and a delta of `seconds`.
pub fn advance_time(app: &mut App, seconds: f32) {
    let mut time = app.world.resource_mut::<Time>();
    let last = time.last_update().unwrap_or_else(|| time.startup());

    time.update_with_instant(last + Duration::from_secs_f32(seconds));
}

pub fn connect_peer(app: &mut App) -> PeerId {
    app.world.resource_mut::<ReplicationPeers>().connect()
}

pub fn send_request(app: &mut App, actor: Entity, target: Option<Entity>) {
    app.world
        .resource_mut::<Events<InteractRequest>>()
        .send(InteractRequest { actor, target });
}

pub fn send_hold(app: &mut App, actor: Entity) {
    app.world
        .resource_mut::<Events<InteractHold>>()
        .send(InteractHold { actor });
}

pub fn send_cancel(app: &mut App, actor: Entity, reason: CancelReason) {
    app.world
        .resource_mut::<Events<InteractCancel>>()
        .send(InteractCancel { actor, reason });
}

pub fn send_ability_callback(
    app: &mut App,
    session_id: SessionId,
    result: Result<EffectPayload, InteractionError>,
) {
    app.world
        .resource_mut::<Events<AbilityCallback>>()
        .send(AbilityCallback { session_id, result });
}

pub fn send_inbound_update(app: &mut App, update: SessionUpdate) {
    app.world
        .resource_mut::<Events<InboundSessionUpdate>>()
        .send(InboundSessionUpdate(update));
}

/// Everything still buffered for this event type, oldest first.
pub fn drain_events<E: Event + Clone>(app: &mut App) -> Vec<E> {
    let events = app.world.resource::<Events<E>>();
    let mut reader = events.get_reader();

    reader.iter(events).cloned().collect()
}

pub fn sessions_for_actor(app: &mut App, actor: Entity) -> Vec<SessionId> {
    app.world
        .resource::<SessionStore>()
        .iter()
        .filter(|session| session.actor == actor)
        .map(|session| session.id)
        .collect()
}

pub fn session_for_actor(app: &mut App, actor: Entity) -> SessionId {
    let ids = sessions_for_actor(app, actor);
    assert_eq!(ids.len(), 1, "expected exactly one session for {actor:?}");

    ids[0]
}

pub fn session_state(app: &mut App, id: SessionId) -> SessionState {
    app.world
        .resource::<SessionStore>()
        .get(id)
        .map(|session| session.state)
        .expect("expected session")
}
