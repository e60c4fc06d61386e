use bevy::prelude::*;

use crate::InteractionSet;

use super::{
    events::{
        InteractCancel, InteractHold, InteractRequest, InvokeAbility, SessionEvent,
        SessionNotification,
    },
    resources::{SessionConfig, SessionObservers, SessionStore},
    systems::*,
};

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionStore>()
            .init_resource::<SessionObservers>()
            .init_resource::<SessionConfig>()
            .add_event::<InteractRequest>()
            .add_event::<InteractHold>()
            .add_event::<InteractCancel>()
            .add_event::<InvokeAbility>()
            .add_event::<SessionEvent>()
            .add_event::<SessionNotification>();

        app.add_systems(
            Update,
            (handle_requests, handle_cancels, update_pending)
                .chain()
                .in_set(InteractionSet::Session),
        );

        app.add_systems(
            Update,
            broadcast_session_changes.in_set(InteractionSet::Broadcast),
        );

        app.add_systems(
            Update,
            (notify_observers, sweep_sessions)
                .chain()
                .in_set(InteractionSet::Notify),
        );
    }
}
