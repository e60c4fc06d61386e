use bevy::prelude::*;

use crate::{
    errors::InteractionError,
    registry::components::TagSet,
    session::components::{EffectPayload, SessionId},
};

use super::resources::AbilityGrantHandle;

/// Boundary event handed to the ability-framework adapter: grant and activate
/// the gameplay-effect task for one session.
#[derive(Event, Debug, Clone)]
pub struct ActivateAbility {
    pub session_id: SessionId,
    pub handle: AbilityGrantHandle,
    pub actor: Entity,
    pub target: Entity,
    pub tags: TagSet,
}

/// Asynchronous outcome reported back by the ability framework. Failures are
/// `AbilityRejected`, `PreconditionFailed`, or `Interrupted`.
#[derive(Event, Debug, Clone)]
pub struct AbilityCallback {
    pub session_id: SessionId,
    pub result: Result<EffectPayload, InteractionError>,
}

/// Tear-down signal for a grant whose session ended without consuming it.
#[derive(Event, Debug, Clone)]
pub struct ReleaseAbility {
    pub session_id: SessionId,
    pub handle: AbilityGrantHandle,
}
