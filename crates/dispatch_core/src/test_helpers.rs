//! Test helpers for common test setup.

use bevy_ecs::prelude::World;

use crate::matching::{FifoMatching, MatchingAlgorithm, MatchingAlgorithmResource};
use crate::registry::{DriverRoster, RideLog};

/// Create a dispatch world with the default FIFO matching policy.
///
/// Mirrors the resource setup done by [`crate::dispatch::Dispatch::new`];
/// tests that drive the registry, matcher, or lifecycle functions directly
/// start from this.
pub fn dispatch_world() -> World {
    dispatch_world_with(Box::new(FifoMatching))
}

/// Create a dispatch world with a specific matching policy.
pub fn dispatch_world_with(algorithm: Box<dyn MatchingAlgorithm>) -> World {
    let mut world = World::new();
    world.insert_resource(DriverRoster::default());
    world.insert_resource(RideLog::default());
    world.insert_resource(MatchingAlgorithmResource::new(algorithm));
    world
}
