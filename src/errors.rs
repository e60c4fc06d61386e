use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kinds delivered as terminal session outcomes. These never cross
/// component boundaries as panics; every fallible operation reports one of
/// these through the session's own state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionError {
    #[error("an interactable with this identity is already registered")]
    DuplicateIdentity,
    #[error("target is claimed by another session")]
    TargetOccupied,
    #[error("actor is outside the target's activation range")]
    TargetOutOfRange,
    #[error("target is no longer registered")]
    TargetRemoved,
    /// The authority reports hold expiry as
    /// `SessionOutcome::Cancelled(CancelReason::HoldTimeout)`; this variant
    /// completes the wire taxonomy for consumers that only match on errors.
    #[error("hold was not confirmed in time")]
    HoldTimeout,
    #[error("the ability system rejected activation")]
    AbilityRejected,
    #[error("an ability precondition failed")]
    PreconditionFailed,
    #[error("the ability was interrupted")]
    Interrupted,
}

/// Why a session was cancelled rather than completing or failing outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    UserRequest,
    TargetRemoved,
    OutOfRange,
    HoldTimeout,
    Interrupted,
}
