use bevy::{
    prelude::*,
    utils::{HashMap, HashSet},
};
use uuid::Uuid;

use crate::session::components::{SessionId, SessionOutcome, SessionState};

use super::events::SessionUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(Uuid);

/// Remote observers whose mirrors depend on published updates. Maintained by
/// the networking layer as connections come and go.
#[derive(Resource, Default)]
pub struct ReplicationPeers {
    peers: HashSet<PeerId>,
}

impl ReplicationPeers {
    pub fn connect(&mut self) -> PeerId {
        let peer = PeerId(Uuid::new_v4());
        self.peers.insert(peer);
        peer
    }

    pub fn disconnect(&mut self, peer: PeerId) {
        self.peers.remove(&peer);
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Read-only mirror of one remote session.
#[derive(Debug, Clone)]
pub struct SessionMirror {
    pub state: SessionState,
    pub seq: u32,
    pub outcome: Option<SessionOutcome>,
    pub applied_at: f32,
}

/// Non-authoritative view of remote sessions, last-writer-wins by sequence
/// number.
#[derive(Resource, Default)]
pub struct SessionMirrors {
    mirrors: HashMap<SessionId, SessionMirror>,
}

impl SessionMirrors {
    /// Applies a record if it advances the sequence. Stale and duplicate
    /// deliveries are dropped, as is a first record that is already terminal
    /// (a leftover of a mirror we have since discarded).
    pub fn apply(&mut self, update: &SessionUpdate, now: f32) -> bool {
        match self.mirrors.get_mut(&update.session_id) {
            Some(mirror) => {
                if update.seq <= mirror.seq {
                    return false;
                }

                mirror.seq = update.seq;
                mirror.state = update.state;
                mirror.outcome = update.outcome.clone();
                mirror.applied_at = now;

                true
            }
            None => {
                if update.state.is_terminal() {
                    return false;
                }

                self.mirrors.insert(
                    update.session_id,
                    SessionMirror {
                        state: update.state,
                        seq: update.seq,
                        outcome: update.outcome.clone(),
                        applied_at: now,
                    },
                );

                true
            }
        }
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionMirror> {
        self.mirrors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    pub fn sweep(&mut self, now: f32, linger: f32) {
        self.mirrors
            .retain(|_, mirror| !mirror.state.is_terminal() || now - mirror.applied_at < linger);
    }
}
