use bevy::{
    prelude::*,
    utils::{HashMap, HashSet},
};
use uuid::Uuid;

use crate::values::{HOLD_CONFIRM_WINDOW, MIRROR_LINGER, SESSION_LINGER};

use super::components::{InteractionSession, SessionId, SessionOutcome, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// One canonical state change, recorded in commit order and drained once per
/// tick for broadcast and replication.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub session_id: SessionId,
    pub actor: Entity,
    pub target: Entity,
    pub seq: u32,
    pub state: SessionState,
    pub outcome: Option<SessionOutcome>,
}

/// Canonical session state. Only the authority's tick pass mutates it, so no
/// locking is involved anywhere.
#[derive(Resource, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, InteractionSession>,
    changes: Vec<SessionChange>,
}

impl SessionStore {
    /// Creates a session in `Requested` and records the first change.
    pub fn create(
        &mut self,
        actor: Entity,
        target: Entity,
        hold: Option<f32>,
        now: f32,
    ) -> SessionId {
        let id = SessionId::new();

        self.sessions.insert(
            id,
            InteractionSession {
                id,
                actor,
                target,
                state: SessionState::Requested,
                started_at: now,
                hold: hold.map(|seconds| Timer::from_seconds(seconds, TimerMode::Once)),
                last_confirm: now,
                seq: 1,
                outcome: None,
                finished_at: None,
            },
        );

        self.changes.push(SessionChange {
            session_id: id,
            actor,
            target,
            seq: 1,
            state: SessionState::Requested,
            outcome: None,
        });

        id
    }

    /// Applies a transition and records it. Terminal states absorb: a
    /// transition on a finished (or unknown) session is ignored.
    pub fn transition(
        &mut self,
        id: SessionId,
        state: SessionState,
        outcome: Option<SessionOutcome>,
        now: f32,
    ) -> bool {
        let Some(session) = self.sessions.get_mut(&id) else {
            return false;
        };

        if session.state.is_terminal() {
            return false;
        }

        session.state = state;
        session.seq += 1;

        if state.is_terminal() {
            session.outcome = outcome.clone();
            session.finished_at = Some(now);
        }

        self.changes.push(SessionChange {
            session_id: id,
            actor: session.actor,
            target: session.target,
            seq: session.seq,
            state,
            outcome,
        });

        true
    }

    pub fn get(&self, id: SessionId) -> Option<&InteractionSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut InteractionSession> {
        self.sessions.get_mut(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn remove(&mut self, id: SessionId) -> Option<InteractionSession> {
        self.sessions.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionSession> {
        self.sessions.values()
    }

    pub fn live_session_for_actor(&self, actor: Entity) -> Option<SessionId> {
        self.sessions
            .values()
            .find(|session| session.actor == actor && !session.state.is_terminal())
            .map(|session| session.id)
    }

    pub fn live_sessions_for_target(&self, target: Entity) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|session| session.target == target && !session.state.is_terminal())
            .map(|session| session.id)
            .collect()
    }

    pub fn ids_in_state(&self, state: SessionState) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|session| session.state == state)
            .map(|session| session.id)
            .collect()
    }

    pub fn terminal_ids(&self) -> Vec<(SessionId, f32)> {
        self.sessions
            .values()
            .filter_map(|session| session.finished_at.map(|at| (session.id, at)))
            .collect()
    }

    pub fn drain_changes(&mut self) -> Vec<SessionChange> {
        std::mem::take(&mut self.changes)
    }
}

/// Subscribe/unsubscribe surface for UI and other observer layers, keyed by
/// session id or by interacting actor.
#[derive(Resource, Default)]
pub struct SessionObservers {
    by_session: HashMap<SessionId, HashSet<ObserverId>>,
    by_actor: HashMap<Entity, HashSet<ObserverId>>,
}

impl SessionObservers {
    pub fn subscribe_session(&mut self, session: SessionId, observer: ObserverId) {
        self.by_session.entry(session).or_default().insert(observer);
    }

    pub fn unsubscribe_session(&mut self, session: SessionId, observer: ObserverId) {
        if let Some(observers) = self.by_session.get_mut(&session) {
            observers.remove(&observer);

            if observers.is_empty() {
                self.by_session.remove(&session);
            }
        }
    }

    pub fn subscribe_actor(&mut self, actor: Entity, observer: ObserverId) {
        self.by_actor.entry(actor).or_default().insert(observer);
    }

    pub fn unsubscribe_actor(&mut self, actor: Entity, observer: ObserverId) {
        if let Some(observers) = self.by_actor.get_mut(&actor) {
            observers.remove(&observer);

            if observers.is_empty() {
                self.by_actor.remove(&actor);
            }
        }
    }

    pub fn forget_session(&mut self, session: SessionId) {
        self.by_session.remove(&session);
    }

    pub fn observers_for(&self, session: SessionId, actor: Option<Entity>) -> HashSet<ObserverId> {
        let mut observers: HashSet<ObserverId> = self
            .by_session
            .get(&session)
            .cloned()
            .unwrap_or_default();

        if let Some(actor) = actor {
            if let Some(for_actor) = self.by_actor.get(&actor) {
                observers.extend(for_actor.iter().copied());
            }
        }

        observers
    }
}

/// Tunable timings. Tests shrink these; the consuming app may override the
/// defaults from `values`.
#[derive(Resource, Debug, Clone)]
pub struct SessionConfig {
    pub hold_confirm_window: f32,
    pub session_linger: f32,
    pub mirror_linger: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hold_confirm_window: HOLD_CONFIRM_WINDOW,
            session_linger: SESSION_LINGER,
            mirror_linger: MIRROR_LINGER,
        }
    }
}
