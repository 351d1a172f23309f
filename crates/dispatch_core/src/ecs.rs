use std::fmt;

use bevy_ecs::prelude::{Component, Entity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriverState {
    Available,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RideState {
    Requested,
    Matched,
    Completed,
    Cancelled,
}

impl RideState {
    /// Completed and Cancelled rides accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, RideState::Completed | RideState::Cancelled)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Available => write!(f, "Available"),
            DriverState::Busy => write!(f, "Busy"),
        }
    }
}

impl fmt::Display for RideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideState::Requested => write!(f, "Requested"),
            RideState::Matched => write!(f, "Matched"),
            RideState::Completed => write!(f, "Completed"),
            RideState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Rider {
    /// Backlink to the rider's Requested or Matched ride, if any.
    pub active_ride: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Driver {
    pub state: DriverState,
    /// Backlink to the Matched ride this driver is bound to, if any.
    pub active_ride: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Ride {
    pub state: RideState,
    pub rider: Entity,
    /// Set iff state is Matched or Completed.
    pub driver: Option<Entity>,
}

/// Human-readable name attached to riders and drivers.
#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct DisplayName(pub String);

/// Identifier assigned to a rider at registration.
///
/// Ids wrap the underlying entity; the registry never despawns, so raw
/// indices are unique and monotonic across riders, drivers, and rides
/// alike. An id rebuilt from an index that was never assigned resolves to
/// `NotFound` on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RiderId(pub(crate) Entity);

impl RiderId {
    pub fn from_raw(index: u32) -> Self {
        Self(Entity::from_raw(index))
    }

    pub fn index(self) -> u32 {
        self.0.index()
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.index())
    }
}

/// Identifier assigned to a driver at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverId(pub(crate) Entity);

impl DriverId {
    pub fn from_raw(index: u32) -> Self {
        Self(Entity::from_raw(index))
    }

    pub fn index(self) -> u32 {
        self.0.index()
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.index())
    }
}

/// Identifier assigned to a ride when it is first requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RideId(pub(crate) Entity);

impl RideId {
    pub fn from_raw(index: u32) -> Self {
        Self(Entity::from_raw(index))
    }

    pub fn index(self) -> u32 {
        self.0.index()
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.index())
    }
}
