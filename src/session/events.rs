use bevy::prelude::*;

use crate::errors::CancelReason;

use super::{
    components::{SessionId, SessionOutcome, SessionState},
    resources::ObserverId,
};

/// An actor asks to interact. Without an explicit target the actor's current
/// top candidate is used.
#[derive(Event, Debug, Clone)]
pub struct InteractRequest {
    pub actor: Entity,
    pub target: Option<Entity>,
}

/// Keepalive for a hold-to-interact session, expected every frame the actor
/// keeps holding. A pending session missing these past the confirm window
/// cancels with `HoldTimeout`.
#[derive(Event, Debug, Clone)]
pub struct InteractHold {
    pub actor: Entity,
}

/// Explicit cancellation: `UserRequest` when the actor lets go, `Interrupted`
/// when another game event breaks the interaction.
#[derive(Event, Debug, Clone)]
pub struct InteractCancel {
    pub actor: Entity,
    pub reason: CancelReason,
}

/// Internal: a session reached `Active` and wants its gameplay effect run.
#[derive(Event, Debug, Clone)]
pub struct InvokeAbility {
    pub session_id: SessionId,
}

/// Raised once per state change, canonical or mirrored. Mirrored changes
/// carry no actor/target; those live only on the authority.
#[derive(Event, Debug, Clone)]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub actor: Option<Entity>,
    pub target: Option<Entity>,
    pub state: SessionState,
    pub seq: u32,
    pub outcome: Option<SessionOutcome>,
}

/// Targeted notification for one subscribed observer.
#[derive(Event, Debug, Clone)]
pub struct SessionNotification {
    pub observer: ObserverId,
    pub session_id: SessionId,
    pub state: SessionState,
    pub outcome: Option<SessionOutcome>,
}
