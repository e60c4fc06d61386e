use bevy::prelude::*;

use crate::InteractionSet;

use super::{
    events::{InboundSessionUpdate, OutboundSessionUpdate},
    resources::{ReplicationPeers, SessionMirrors},
    systems::*,
};

pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReplicationPeers>()
            .init_resource::<SessionMirrors>()
            .add_event::<OutboundSessionUpdate>()
            .add_event::<InboundSessionUpdate>();

        app.add_systems(
            Update,
            (publish_updates, apply_remote_updates, sweep_mirrors)
                .chain()
                .in_set(InteractionSet::Replication),
        );
    }
}
