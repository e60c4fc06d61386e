use std::cmp::Ordering;

use bevy::prelude::*;

use crate::{
    registry::resources::{InteractableRegistry, QueryRegion, RegisteredInteractable},
    spatial::components::{Facing, Position},
    values::{ALIGNMENT_WEIGHT, PRIORITY_CAP, PRIORITY_WEIGHT, PROXIMITY_WEIGHT},
};

use super::components::{CandidateList, InteractionCandidate, InteractionSource};

/// Runs every tick for every scanning actor. Read-only against the registry
/// snapshot; bounded to the source's scan region, never a full-registry scan.
pub fn resolve_candidates(
    registry: Res<InteractableRegistry>,
    mut actors: Query<(
        Entity,
        &Position,
        &Facing,
        &InteractionSource,
        &mut CandidateList,
    )>,
) {
    for (actor, position, facing, source, mut candidates) in actors.iter_mut() {
        let region = QueryRegion {
            center: position.0,
            radius: source.range,
        };

        let mut scored: Vec<(InteractionCandidate, u64)> = registry
            .query(region, &source.capabilities)
            .filter(|(target, _)| *target != actor)
            .filter(|(_, entry)| !entry.is_claimed())
            .filter(|(_, entry)| position.0.distance(entry.position) <= entry.descriptor.range())
            .map(|(target, entry)| {
                (
                    InteractionCandidate {
                        target,
                        score: score_candidate(position.0, facing.0, source.range, entry),
                    },
                    entry.order,
                )
            })
            .collect();

        scored.sort_by(|(a, a_order), (b, b_order)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_order.cmp(b_order))
        });
        scored.truncate(source.max_candidates);

        candidates.0 = scored.into_iter().map(|(candidate, _)| candidate).collect();
    }
}

/// Higher is better: close, centered in the actor's view, high priority.
pub fn score_candidate(
    actor: Vec3,
    facing: Vec3,
    scan_range: f32,
    entry: &RegisteredInteractable,
) -> f32 {
    let offset = entry.position - actor;

    let proximity = 1.0 - (offset.length() / scan_range.max(f32::EPSILON)).clamp(0.0, 1.0);

    // Dot of the view direction with the direction to the target, mapped from
    // [-1, 1] to [0, 1].
    let alignment = (facing.normalize_or_zero().dot(offset.normalize_or_zero()) + 1.0) / 2.0;

    let priority = (entry.descriptor.priority() / PRIORITY_CAP).clamp(0.0, 1.0);

    PROXIMITY_WEIGHT * proximity + ALIGNMENT_WEIGHT * alignment + PRIORITY_WEIGHT * priority
}

#[cfg(test)]
mod tests {
    use crate::{
        session::components::SessionId,
        test::{
            actor_builder::ActorBuilder, app_builder::AppBuilder,
            interactable_builder::InteractableBuilder,
        },
    };

    use super::*;

    fn candidates(app: &mut App, actor: Entity) -> Vec<Entity> {
        app.world
            .get::<CandidateList>(actor)
            .unwrap()
            .0
            .iter()
            .map(|candidate| candidate.target)
            .collect()
    }

    #[test]
    fn respects_max_candidates_and_region() {
        let mut app = AppBuilder::new().build();

        for x in 1..=3 {
            InteractableBuilder::new("item.take")
                .position(Vec3::new(x as f32, 0.0, 0.0))
                .range(10.0)
                .build(&mut app);
        }

        let distant = InteractableBuilder::new("item.take")
            .position(Vec3::new(50.0, 0.0, 0.0))
            .range(10.0)
            .build(&mut app);

        let actor = ActorBuilder::new()
            .range(10.0)
            .max_candidates(2)
            .build(&mut app);

        app.update();

        let found = candidates(&mut app, actor);

        assert_eq!(found.len(), 2);
        assert!(!found.contains(&distant));
    }

    #[test]
    fn prefers_targets_in_the_view_direction() {
        let mut app = AppBuilder::new().build();

        let behind = InteractableBuilder::new("door.open")
            .position(Vec3::new(-2.0, 0.0, 0.0))
            .build(&mut app);
        let ahead = InteractableBuilder::new("door.open")
            .position(Vec3::new(2.0, 0.0, 0.0))
            .build(&mut app);

        let actor = ActorBuilder::new()
            .facing(Vec3::X)
            .range(10.0)
            .build(&mut app);

        app.update();

        assert_eq!(candidates(&mut app, actor), vec![ahead, behind]);
    }

    #[test]
    fn high_priority_targets_outrank_closer_default_ones() {
        let mut app = AppBuilder::new().build();

        // Closer and dead ahead, but default priority.
        let near = InteractableBuilder::new("door.open")
            .position(Vec3::new(2.0, 0.0, 0.0))
            .range(10.0)
            .build(&mut app);
        let boosted = InteractableBuilder::new("door.open")
            .priority(10.0)
            .position(Vec3::new(5.0, 0.0, 0.0))
            .range(10.0)
            .build(&mut app);

        let actor = ActorBuilder::new()
            .facing(Vec3::X)
            .range(10.0)
            .build(&mut app);

        app.update();

        assert_eq!(candidates(&mut app, actor), vec![boosted, near]);
    }

    #[test]
    fn ties_break_by_registration_order() {
        let mut app = AppBuilder::new().build();

        let first = InteractableBuilder::new("item.take")
            .position(Vec3::new(0.0, 0.0, 2.0))
            .build(&mut app);
        let second = InteractableBuilder::new("item.take")
            .position(Vec3::new(0.0, 0.0, 2.0))
            .build(&mut app);

        let actor = ActorBuilder::new().range(10.0).build(&mut app);

        app.update();

        assert_eq!(candidates(&mut app, actor), vec![first, second]);
    }

    #[test]
    fn skips_claimed_exclusive_targets() {
        let mut app = AppBuilder::new().build();

        let door = InteractableBuilder::new("door.open")
            .exclusive()
            .position(Vec3::new(2.0, 0.0, 0.0))
            .build(&mut app);

        let actor = ActorBuilder::new().range(10.0).build(&mut app);
        app.update();

        assert_eq!(candidates(&mut app, actor), vec![door]);

        app.world
            .resource_mut::<InteractableRegistry>()
            .try_claim(door, SessionId::new())
            .unwrap();
        app.update();

        assert!(candidates(&mut app, actor).is_empty());
    }

    #[test]
    fn filters_by_capability_tags() {
        let mut app = AppBuilder::new().build();

        InteractableBuilder::new("door.open")
            .position(Vec3::new(2.0, 0.0, 0.0))
            .build(&mut app);
        let item = InteractableBuilder::new("item.take")
            .position(Vec3::new(2.0, 0.0, 0.0))
            .build(&mut app);

        let actor = ActorBuilder::new()
            .range(10.0)
            .capabilities(["item.take"])
            .build(&mut app);

        app.update();

        assert_eq!(candidates(&mut app, actor), vec![item]);
    }
}
