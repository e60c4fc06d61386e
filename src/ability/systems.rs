use bevy::prelude::*;

use crate::{
    registry::resources::InteractableRegistry,
    session::{
        components::{SessionOutcome, SessionState},
        events::InvokeAbility,
        resources::SessionStore,
    },
    value_or_continue,
};

use super::{
    events::{AbilityCallback, ActivateAbility, ReleaseAbility},
    resources::AbilityGrants,
};

pub fn grant_abilities(
    mut invokes: EventReader<InvokeAbility>,
    mut grants: ResMut<AbilityGrants>,
    mut activations: EventWriter<ActivateAbility>,
    registry: Res<InteractableRegistry>,
    sessions: Res<SessionStore>,
) {
    for invoke in invokes.iter() {
        let session = value_or_continue!(sessions.get(invoke.session_id));

        if session.state != SessionState::Active {
            debug!(
                "not granting for session {}: state is {}",
                session.id, session.state
            );

            continue;
        }

        let tags = registry
            .get(session.target)
            .map(|entry| entry.descriptor.tags().clone())
            .unwrap_or_default();

        let handle = grants.grant(session.id);

        activations.send(ActivateAbility {
            session_id: session.id,
            handle,
            actor: session.actor,
            target: session.target,
            tags,
        });
    }
}

/// Resumes the session on the tick the framework's outcome arrives. The
/// grant is consumed here, so duplicate or late callbacks find nothing and
/// are ignored.
pub fn deliver_callbacks(
    mut callbacks: EventReader<AbilityCallback>,
    mut grants: ResMut<AbilityGrants>,
    mut registry: ResMut<InteractableRegistry>,
    mut sessions: ResMut<SessionStore>,
    time: Res<Time>,
) {
    let now = time.elapsed_seconds();

    for callback in callbacks.iter() {
        let target = match sessions.get(callback.session_id) {
            Some(session) if session.state == SessionState::Active => session.target,
            _ => {
                debug!(
                    "ignoring ability callback for session {}: not active",
                    callback.session_id
                );

                continue;
            }
        };

        if grants.take(callback.session_id).is_none() {
            debug!(
                "ignoring ability callback for session {}: no live grant",
                callback.session_id
            );

            continue;
        }

        match &callback.result {
            Ok(payload) => {
                sessions.transition(
                    callback.session_id,
                    SessionState::Completed,
                    Some(SessionOutcome::Completed(payload.clone())),
                    now,
                );
            }
            Err(err) => {
                sessions.transition(
                    callback.session_id,
                    SessionState::Failed,
                    Some(SessionOutcome::Failed(*err)),
                    now,
                );
            }
        }

        registry.release(target, callback.session_id);
    }
}

/// Fire-and-forget teardown for grants whose session ended some other way
/// (cancel, deregistration, sweep). Each grant is released exactly once.
pub fn release_stale_grants(
    mut grants: ResMut<AbilityGrants>,
    sessions: Res<SessionStore>,
    mut releases: EventWriter<ReleaseAbility>,
) {
    for session_id in grants.sessions() {
        let live = sessions
            .get(session_id)
            .map_or(false, |session| !session.state.is_terminal());

        if live {
            continue;
        }

        if let Some(handle) = grants.take(session_id) {
            debug!("released ability grant for session {session_id}");
            releases.send(ReleaseAbility { session_id, handle });
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        errors::{CancelReason, InteractionError},
        test::{
            actor_builder::ActorBuilder,
            app_builder::AppBuilder,
            interactable_builder::InteractableBuilder,
            utils::{
                connect_peer, drain_events, send_ability_callback, send_cancel, send_request,
                session_for_actor, session_state,
            },
        },
    };

    use super::*;

    #[rstest]
    #[case(InteractionError::AbilityRejected)]
    #[case(InteractionError::PreconditionFailed)]
    #[case(InteractionError::Interrupted)]
    fn bridge_failure_fails_the_session_and_releases_everything(
        #[case] kind: InteractionError,
    ) {
        let mut app = AppBuilder::new().build();
        connect_peer(&mut app);

        let door = InteractableBuilder::new("door.open")
            .exclusive()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .build(&mut app);
        let actor = ActorBuilder::new().build(&mut app);
        app.update();

        send_request(&mut app, actor, None);
        app.update();

        let id = session_for_actor(&mut app, actor);
        assert_eq!(session_state(&mut app, id), SessionState::Active);
        assert_eq!(app.world.resource::<AbilityGrants>().len(), 1);

        send_ability_callback(&mut app, id, Err(kind));
        app.update();

        assert_eq!(session_state(&mut app, id), SessionState::Failed);

        let store = app.world.resource::<SessionStore>();
        assert_eq!(
            store.get(id).unwrap().outcome,
            Some(SessionOutcome::Failed(kind))
        );

        // Occupancy and the grant are both released, the grant exactly once.
        let registry = app.world.resource::<InteractableRegistry>();
        assert!(!registry.get(door).unwrap().is_claimed());
        assert!(app.world.resource::<AbilityGrants>().is_empty());
        assert!(drain_events::<ReleaseAbility>(&mut app).is_empty());
    }

    #[test]
    fn cancelling_an_active_session_releases_the_grant_once() {
        let mut app = AppBuilder::new().build();
        connect_peer(&mut app);

        InteractableBuilder::new("door.open")
            .exclusive()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .build(&mut app);
        let actor = ActorBuilder::new().build(&mut app);
        app.update();

        send_request(&mut app, actor, None);
        app.update();

        let id = session_for_actor(&mut app, actor);
        assert_eq!(session_state(&mut app, id), SessionState::Active);

        send_cancel(&mut app, actor, CancelReason::Interrupted);
        app.update();

        assert_eq!(session_state(&mut app, id), SessionState::Cancelled);
        assert!(app.world.resource::<AbilityGrants>().is_empty());

        let releases = drain_events::<ReleaseAbility>(&mut app);
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].session_id, id);

        app.update();
        assert!(app.world.resource::<AbilityGrants>().is_empty());
    }

    #[test]
    fn deregistering_an_active_target_tears_the_grant_down() {
        let mut app = AppBuilder::new().build();
        connect_peer(&mut app);

        let door = InteractableBuilder::new("door.open")
            .position(Vec3::new(1.0, 0.0, 0.0))
            .build(&mut app);
        let actor = ActorBuilder::new().build(&mut app);
        app.update();

        send_request(&mut app, actor, None);
        app.update();

        let id = session_for_actor(&mut app, actor);
        assert_eq!(session_state(&mut app, id), SessionState::Active);

        app.world.entity_mut(door).remove::<crate::registry::components::Interactable>();
        app.update();

        assert_eq!(session_state(&mut app, id), SessionState::Cancelled);

        let releases = drain_events::<ReleaseAbility>(&mut app);
        assert_eq!(releases.len(), 1);
        assert!(app.world.resource::<AbilityGrants>().is_empty());
    }
}
