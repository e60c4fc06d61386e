use bevy::prelude::*;

use crate::spatial::components::{Facing, Position};

use super::components::{CandidateList, InteractionSource};

#[derive(Bundle)]
pub struct InteractorBundle {
    pub source: InteractionSource,
    pub position: Position,
    pub facing: Facing,
    pub candidates: CandidateList,
}
