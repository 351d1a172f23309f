//! Driver selection for ride requests.

pub mod algorithm;
pub mod fifo;

use bevy_ecs::prelude::{Entity, Resource, World};
use log::debug;

pub use algorithm::MatchingAlgorithm;
pub use fifo::FifoMatching;

use crate::ecs::{DriverId, DriverState, RiderId};
use crate::error::DispatchError;
use crate::registry;

/// Resource wrapper for the matching algorithm trait object.
#[derive(Resource)]
pub struct MatchingAlgorithmResource(pub Box<dyn MatchingAlgorithm>);

impl MatchingAlgorithmResource {
    pub fn new(algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        Self(algorithm)
    }
}

impl std::ops::Deref for MatchingAlgorithmResource {
    type Target = dyn MatchingAlgorithm;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Outcome of a match attempt. "No driver available" is an expected result
/// the caller handles, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(DriverId),
    NoDriverAvailable,
}

/// Select a driver for `rider` and mark it Busy.
///
/// The read-then-mark-Busy sequence runs under the single `&mut World`
/// borrow, so no other match attempt can observe the chosen driver as
/// Available in between. When the available pool is empty nothing is
/// mutated.
pub fn request_match(world: &mut World, rider: RiderId) -> Result<MatchOutcome, DispatchError> {
    registry::rider(world, rider)?;

    let available: Vec<Entity> = registry::available_drivers(world)
        .into_iter()
        .map(|id| id.0)
        .collect();

    let selected = world
        .resource::<MatchingAlgorithmResource>()
        .select(rider.0, &available);

    let Some(driver_entity) = selected else {
        debug!("no driver available for rider {rider}");
        return Ok(MatchOutcome::NoDriverAvailable);
    };
    // Selections outside the candidate slice are discarded.
    if !available.contains(&driver_entity) {
        debug!("policy selected a non-candidate driver for rider {rider}, discarding");
        return Ok(MatchOutcome::NoDriverAvailable);
    }

    let driver_id = DriverId(driver_entity);
    registry::set_driver_state(world, driver_id, DriverState::Busy)?;
    debug!("matched rider {rider} with driver {driver_id}");
    Ok(MatchOutcome::Matched(driver_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::dispatch_world;

    #[test]
    fn match_marks_first_driver_busy() {
        let mut world = dispatch_world();
        let rider = registry::register_rider(&mut world, "Ana").expect("rider");
        let d1 = registry::register_driver(&mut world, "First").expect("driver");
        let d2 = registry::register_driver(&mut world, "Second").expect("driver");

        let outcome = request_match(&mut world, rider).expect("match");
        assert_eq!(outcome, MatchOutcome::Matched(d1));
        assert_eq!(
            registry::driver(&world, d1).expect("driver").state,
            DriverState::Busy
        );
        assert_eq!(
            registry::driver(&world, d2).expect("driver").state,
            DriverState::Available
        );
    }

    #[test]
    fn empty_pool_yields_no_driver_and_mutates_nothing() {
        let mut world = dispatch_world();
        let rider = registry::register_rider(&mut world, "Ana").expect("rider");

        let outcome = request_match(&mut world, rider).expect("match");
        assert_eq!(outcome, MatchOutcome::NoDriverAvailable);
        assert!(registry::available_drivers(&world).is_empty());
    }

    #[test]
    fn unknown_rider_is_rejected() {
        let mut world = dispatch_world();
        registry::register_driver(&mut world, "Bo").expect("driver");

        let err = request_match(&mut world, RiderId::from_raw(42)).unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { .. }));
    }

    #[test]
    fn non_candidate_selection_is_discarded() {
        struct Rogue;
        impl MatchingAlgorithm for Rogue {
            fn select(&self, _rider: Entity, _available: &[Entity]) -> Option<Entity> {
                Some(Entity::from_raw(9999))
            }
        }

        let mut world = crate::test_helpers::dispatch_world_with(Box::new(Rogue));
        let rider = registry::register_rider(&mut world, "Ana").expect("rider");
        let driver = registry::register_driver(&mut world, "Bo").expect("driver");

        let outcome = request_match(&mut world, rider).expect("match");
        assert_eq!(outcome, MatchOutcome::NoDriverAvailable);
        assert_eq!(
            registry::driver(&world, driver).expect("driver").state,
            DriverState::Available
        );
    }
}
