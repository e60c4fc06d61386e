use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy)]
pub struct Position(pub Vec3);

/// View direction of an interacting actor. Normalized during scoring, so
/// callers may store any non-zero vector.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub Vec3);
