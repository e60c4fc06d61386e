use bevy::prelude::*;

use crate::InteractionSet;

use super::{resources::InteractableRegistry, systems::*};

pub struct RegistryPlugin;

impl Plugin for RegistryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractableRegistry>();

        app.add_systems(
            Update,
            (deregister_removed, register_added, sync_positions)
                .chain()
                .in_set(InteractionSet::Registry),
        );
    }
}
