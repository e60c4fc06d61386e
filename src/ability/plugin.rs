use bevy::prelude::*;

use crate::InteractionSet;

use super::{
    events::{AbilityCallback, ActivateAbility, ReleaseAbility},
    resources::AbilityGrants,
    systems::*,
};

pub struct AbilityPlugin;

impl Plugin for AbilityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AbilityGrants>()
            .add_event::<ActivateAbility>()
            .add_event::<AbilityCallback>()
            .add_event::<ReleaseAbility>();

        app.add_systems(
            Update,
            (grant_abilities, deliver_callbacks, release_stale_grants)
                .chain()
                .in_set(InteractionSet::Ability),
        );
    }
}
