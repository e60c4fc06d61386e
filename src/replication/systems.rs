use bevy::prelude::*;

use crate::session::{
    events::SessionEvent,
    resources::{SessionConfig, SessionStore},
};

use super::{
    events::{InboundSessionUpdate, OutboundSessionUpdate, SessionUpdate},
    resources::{ReplicationPeers, SessionMirrors},
};

/// Authority side: every canonical state change goes out as a wire record.
/// Events raised for mirrors have no entry in the local store and are never
/// re-published.
pub fn publish_updates(
    mut events: EventReader<SessionEvent>,
    mut outbound: EventWriter<OutboundSessionUpdate>,
    sessions: Res<SessionStore>,
    peers: Res<ReplicationPeers>,
) {
    for event in events.iter() {
        if peers.is_empty() || !sessions.contains(event.session_id) {
            continue;
        }

        outbound.send(OutboundSessionUpdate(SessionUpdate {
            session_id: event.session_id,
            seq: event.seq,
            state: event.state,
            outcome: event.outcome.clone(),
        }));
    }
}

/// Observer side: folds inbound records into the mirrors and raises the same
/// notifications a local session would. Regressions and duplicates indicate
/// stale delivery and are silently dropped.
pub fn apply_remote_updates(
    mut inbound: EventReader<InboundSessionUpdate>,
    mut mirrors: ResMut<SessionMirrors>,
    mut events: EventWriter<SessionEvent>,
    time: Res<Time>,
) {
    let now = time.elapsed_seconds();

    for event in inbound.iter() {
        let update = &event.0;

        if !mirrors.apply(update, now) {
            debug!(
                "dropping session update {} seq {}: stale or duplicate",
                update.session_id, update.seq
            );

            continue;
        }

        events.send(SessionEvent {
            session_id: update.session_id,
            actor: None,
            target: None,
            state: update.state,
            seq: update.seq,
            outcome: update.outcome.clone(),
        });
    }
}

pub fn sweep_mirrors(
    mut mirrors: ResMut<SessionMirrors>,
    config: Res<SessionConfig>,
    time: Res<Time>,
) {
    mirrors.sweep(time.elapsed_seconds(), config.mirror_linger);
}
