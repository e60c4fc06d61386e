use std::fmt::{self, Display, Formatter};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CancelReason, InteractionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Requested → Pending → Active → {Completed | Cancelled | Failed}`.
/// Terminal states absorb.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    Serialize,
    Deserialize,
)]
pub enum SessionState {
    Requested,
    Pending,
    Active,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

/// Domain-specific result of a completed interaction (item acquired, door
/// opened, ...). Opaque to the core; downstream systems decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectPayload(pub serde_json::Value);

/// What a terminal session leaves behind for observers and collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Completed(EffectPayload),
    Cancelled(CancelReason),
    Failed(InteractionError),
}

/// One in-flight interaction attempt. Owned by the authority; remote peers
/// only ever hold read-only mirrors keyed by the session id.
#[derive(Debug)]
pub struct InteractionSession {
    pub id: SessionId,
    pub actor: Entity,
    pub target: Entity,
    pub state: SessionState,
    pub started_at: f32,
    pub hold: Option<Timer>,
    pub last_confirm: f32,
    pub seq: u32,
    pub outcome: Option<SessionOutcome>,
    pub finished_at: Option<f32>,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn terminal_states_are_exactly_the_absorbing_ones() {
        let terminal: Vec<SessionState> = SessionState::iter()
            .filter(SessionState::is_terminal)
            .collect();

        assert_eq!(
            terminal,
            vec![
                SessionState::Completed,
                SessionState::Cancelled,
                SessionState::Failed
            ]
        );
    }
}
