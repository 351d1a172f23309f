use std::fmt;

use thiserror::Error;

use crate::ecs::{RideId, RideState, RiderId};

/// Entity kinds referenced by lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Rider,
    Driver,
    Ride,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Rider => write!(f, "rider"),
            EntityKind::Driver => write!(f, "driver"),
            EntityKind::Ride => write!(f, "ride"),
        }
    }
}

/// Errors surfaced by the dispatch core.
///
/// "No driver available" is deliberately absent: it is an expected business
/// outcome carried in [`crate::matching::MatchOutcome`], not a failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unknown {kind} id {id}")]
    NotFound { kind: EntityKind, id: u32 },
    #[error("cannot {action} ride {ride} in state {from}")]
    InvalidTransition {
        ride: RideId,
        from: RideState,
        action: &'static str,
    },
    #[error("rider {rider} already has active ride {ride}")]
    Conflict { rider: RiderId, ride: RideId },
}
