use bevy::{prelude::*, utils::HashSet};

use crate::{
    errors::{CancelReason, InteractionError},
    registry::resources::InteractableRegistry,
    replication::resources::ReplicationPeers,
    resolver::components::CandidateList,
    spatial::components::Position,
    value_or_continue,
};

use super::{
    components::{SessionOutcome, SessionState},
    events::{
        InteractCancel, InteractHold, InteractRequest, InvokeAbility, SessionEvent,
        SessionNotification,
    },
    resources::{SessionConfig, SessionObservers, SessionStore},
};

/// Validation happens between `Requested` and `Pending`; every failure is a
/// terminal outcome on the session, never a fault crossing the boundary. The
/// occupancy claim doubles as the occupied check: one compare-and-set decides
/// same-window races, first claim wins.
pub fn handle_requests(
    mut requests: EventReader<InteractRequest>,
    mut registry: ResMut<InteractableRegistry>,
    mut sessions: ResMut<SessionStore>,
    mut invokes: EventWriter<InvokeAbility>,
    actors: Query<(&Position, Option<&CandidateList>)>,
    time: Res<Time>,
) {
    let now = time.elapsed_seconds();

    for request in requests.iter() {
        if let Some(live) = sessions.live_session_for_actor(request.actor) {
            debug!(
                "ignoring request from {:?}: session {live} still live",
                request.actor
            );

            continue;
        }

        let (position, candidates) = value_or_continue!(actors.get(request.actor).ok());
        let target = value_or_continue!(request
            .target
            .or_else(|| candidates.and_then(|list| list.top())));

        let Some(entry) = registry.get(target) else {
            let id = sessions.create(request.actor, target, None, now);
            sessions.transition(
                id,
                SessionState::Failed,
                Some(SessionOutcome::Failed(InteractionError::TargetRemoved)),
                now,
            );

            continue;
        };

        let hold = entry.descriptor.hold();
        let within = position.0.distance(entry.position) <= entry.descriptor.range();

        let id = sessions.create(request.actor, target, hold, now);

        if !within {
            sessions.transition(
                id,
                SessionState::Failed,
                Some(SessionOutcome::Failed(InteractionError::TargetOutOfRange)),
                now,
            );

            continue;
        }

        if let Err(err) = registry.try_claim(target, id) {
            sessions.transition(
                id,
                SessionState::Failed,
                Some(SessionOutcome::Failed(err)),
                now,
            );

            continue;
        }

        sessions.transition(id, SessionState::Pending, None, now);

        // No hold requirement: the session goes straight to the ability
        // bridge this same pass.
        if hold.is_none() {
            sessions.transition(id, SessionState::Active, None, now);
            invokes.send(InvokeAbility { session_id: id });
        }
    }
}

/// Works from any non-terminal state. An `Active` session's ability grant is
/// released by the bridge later in the same pass, fire-and-forget.
pub fn handle_cancels(
    mut cancels: EventReader<InteractCancel>,
    mut registry: ResMut<InteractableRegistry>,
    mut sessions: ResMut<SessionStore>,
    time: Res<Time>,
) {
    for cancel in cancels.iter() {
        let id = value_or_continue!(sessions.live_session_for_actor(cancel.actor));
        let target = value_or_continue!(sessions.get(id).map(|session| session.target));

        sessions.transition(
            id,
            SessionState::Cancelled,
            Some(SessionOutcome::Cancelled(cancel.reason)),
            time.elapsed_seconds(),
        );
        registry.release(target, id);
    }
}

/// Per-tick upkeep of `Pending` sessions: range re-check, hold keepalive
/// window, hold timer.
pub fn update_pending(
    mut holds: EventReader<InteractHold>,
    mut registry: ResMut<InteractableRegistry>,
    mut sessions: ResMut<SessionStore>,
    mut invokes: EventWriter<InvokeAbility>,
    config: Res<SessionConfig>,
    actors: Query<&Position>,
    time: Res<Time>,
) {
    let now = time.elapsed_seconds();
    let confirmed: HashSet<Entity> = holds.iter().map(|hold| hold.actor).collect();

    for id in sessions.ids_in_state(SessionState::Pending) {
        let (actor, target) = {
            let session = value_or_continue!(sessions.get(id));
            (session.actor, session.target)
        };

        // A missing entry means deregistration already cancelled this session
        // earlier in the pass.
        let (target_position, range) = match registry.get(target) {
            Some(entry) => (entry.position, entry.descriptor.range()),
            None => continue,
        };

        let out_of_range = actors
            .get(actor)
            .map_or(true, |position| position.0.distance(target_position) > range);

        if out_of_range {
            sessions.transition(
                id,
                SessionState::Cancelled,
                Some(SessionOutcome::Cancelled(CancelReason::OutOfRange)),
                now,
            );
            registry.release(target, id);

            continue;
        }

        let (timed_out, hold_done) = {
            let session = value_or_continue!(sessions.get_mut(id));

            if confirmed.contains(&actor) {
                session.last_confirm = now;
            }

            let timed_out = now - session.last_confirm > config.hold_confirm_window;
            let mut hold_done = false;

            if !timed_out {
                if let Some(hold) = session.hold.as_mut() {
                    hold.tick(time.delta());
                    hold_done = hold.finished();
                }
            }

            (timed_out, hold_done)
        };

        if timed_out {
            sessions.transition(
                id,
                SessionState::Cancelled,
                Some(SessionOutcome::Cancelled(CancelReason::HoldTimeout)),
                now,
            );
            registry.release(target, id);
        } else if hold_done {
            sessions.transition(id, SessionState::Active, None, now);
            invokes.send(InvokeAbility { session_id: id });
        }
    }
}

/// Drains the canonical change log into `SessionEvent`s for observers and
/// the replication coordinator.
pub fn broadcast_session_changes(
    mut sessions: ResMut<SessionStore>,
    mut events: EventWriter<SessionEvent>,
) {
    for change in sessions.drain_changes() {
        events.send(SessionEvent {
            session_id: change.session_id,
            actor: Some(change.actor),
            target: Some(change.target),
            state: change.state,
            seq: change.seq,
            outcome: change.outcome,
        });
    }
}

/// Fans state changes out to subscribed observers. Runs after replication so
/// mirrored changes notify the same way canonical ones do.
pub fn notify_observers(
    mut events: EventReader<SessionEvent>,
    observers: Res<SessionObservers>,
    mut notifications: EventWriter<SessionNotification>,
) {
    for event in events.iter() {
        for observer in observers.observers_for(event.session_id, event.actor) {
            notifications.send(SessionNotification {
                observer,
                session_id: event.session_id,
                state: event.state,
                outcome: event.outcome.clone(),
            });
        }
    }
}

/// Terminal sessions linger long enough for remote mirrors to catch up, then
/// go away. Without replication peers there is nothing to wait for.
pub fn sweep_sessions(
    mut sessions: ResMut<SessionStore>,
    mut observers: ResMut<SessionObservers>,
    peers: Res<ReplicationPeers>,
    config: Res<SessionConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed_seconds();
    let linger = if peers.is_empty() {
        0.0
    } else {
        config.session_linger
    };

    for (id, finished_at) in sessions.terminal_ids() {
        if now - finished_at >= linger {
            sessions.remove(id);
            observers.forget_session(id);
        }
    }
}
