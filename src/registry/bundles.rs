use bevy::prelude::*;

use crate::spatial::components::Position;

use super::components::Interactable;

#[derive(Bundle)]
pub struct InteractableBundle {
    pub interactable: Interactable,
    pub position: Position,
}
