use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::components::{SessionId, SessionOutcome, SessionState};

/// Per-field wire record for one session state change. How these bytes go on
/// the wire is the networking layer's concern, not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub session_id: SessionId,
    pub seq: u32,
    pub state: SessionState,
    pub outcome: Option<SessionOutcome>,
}

/// Authority → networking layer.
#[derive(Event, Debug, Clone)]
pub struct OutboundSessionUpdate(pub SessionUpdate);

/// Networking layer → observing peer.
#[derive(Event, Debug, Clone)]
pub struct InboundSessionUpdate(pub SessionUpdate);
