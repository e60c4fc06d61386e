pub const DEFAULT_ACTIVATION_RANGE: f32 = 2.5;
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

pub const PROXIMITY_WEIGHT: f32 = 0.45;
pub const ALIGNMENT_WEIGHT: f32 = 0.35;
pub const PRIORITY_WEIGHT: f32 = 0.2;
pub const PRIORITY_CAP: f32 = 10.0;

pub const HOLD_CONFIRM_WINDOW: f32 = 0.5;
pub const SESSION_LINGER: f32 = 2.0;
pub const MIRROR_LINGER: f32 = 2.0;
