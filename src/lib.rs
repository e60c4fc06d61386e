//! Server-authoritative object interaction: a registry of interactable world
//! objects, per-tick candidate resolution, a replicated per-attempt session
//! state machine, and a bridge to the ability framework that performs the
//! actual gameplay effect.

use bevy::prelude::*;

pub mod ability;
pub mod errors;
pub mod registry;
pub mod replication;
pub mod resolver;
pub mod session;
pub mod spatial;
pub mod utils;
pub mod values;

#[cfg(test)]
pub mod test;

pub use crate::{
    ability::resources::AbilityGrantHandle,
    errors::{CancelReason, InteractionError},
    registry::components::{CapabilityTag, Interactable, InteractableDescriptor, TagSet},
    resolver::components::{CandidateList, InteractionCandidate, InteractionSource},
    session::components::{EffectPayload, SessionId, SessionOutcome, SessionState},
};

use crate::{
    ability::plugin::AbilityPlugin, registry::plugin::RegistryPlugin,
    replication::plugin::ReplicationPlugin, resolver::plugin::ResolverPlugin,
    session::plugin::SessionPlugin,
};

/// Update-schedule ordering for the interaction pipeline. All canonical state
/// mutation happens inside these sets, on the authority's single tick pass.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    Registry,
    Resolve,
    Session,
    Ability,
    Broadcast,
    Replication,
    Notify,
}

pub struct InteractionsPlugin;

impl Plugin for InteractionsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                InteractionSet::Registry,
                InteractionSet::Resolve,
                InteractionSet::Session,
                InteractionSet::Ability,
                InteractionSet::Broadcast,
                InteractionSet::Replication,
                InteractionSet::Notify,
            )
                .chain(),
        );

        app.add_plugins((
            RegistryPlugin,
            ResolverPlugin,
            SessionPlugin,
            AbilityPlugin,
            ReplicationPlugin,
        ));
    }
}
