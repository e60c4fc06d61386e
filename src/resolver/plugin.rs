use bevy::prelude::*;

use crate::InteractionSet;

use super::systems::resolve_candidates;

pub struct ResolverPlugin;

impl Plugin for ResolverPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            resolve_candidates.in_set(InteractionSet::Resolve),
        );
    }
}
