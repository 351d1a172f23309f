//! Ride lifecycle manager: the single place where a ride's status changes.
//!
//! State machine per ride:
//! Requested -> Matched -> Completed, with Cancelled reachable from
//! Requested and Matched. Completed and Cancelled are terminal. Every entry
//! point validates the current state before touching the ride or the bound
//! driver, so an invalid transition never partially mutates anything.

use bevy_ecs::prelude::{Entity, World};
use log::debug;

use crate::ecs::{Driver, DriverId, DriverState, Ride, RideId, RideState, Rider, RiderId};
use crate::error::{DispatchError, EntityKind};
use crate::matching::{self, MatchOutcome};
use crate::registry::{self, RideLog};

/// Outcome of a ride request. On `NoDriverAvailable` the ride stays
/// Requested; the caller may retry the request later or cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Matched { ride: RideId, driver: DriverId },
    NoDriverAvailable { ride: RideId },
}

pub fn ride_record(world: &World, id: RideId) -> Result<&Ride, DispatchError> {
    world.get::<Ride>(id.0).ok_or(DispatchError::NotFound {
        kind: EntityKind::Ride,
        id: id.index(),
    })
}

/// Request a ride for `rider`, creating it in Requested and attempting a
/// match.
///
/// A rider with a Matched ride cannot request another (`Conflict`). A rider
/// whose previous request is still unmatched retries the match on that same
/// ride instead of creating a second one.
pub fn request_ride(world: &mut World, rider: RiderId) -> Result<RequestOutcome, DispatchError> {
    let active = registry::rider(world, rider)?.active_ride;

    let ride_entity = match active {
        Some(existing) => {
            let state = world
                .get::<Ride>(existing)
                .map(|ride| ride.state)
                .ok_or(DispatchError::NotFound {
                    kind: EntityKind::Ride,
                    id: existing.index(),
                })?;
            if state != RideState::Requested {
                return Err(DispatchError::Conflict {
                    rider,
                    ride: RideId(existing),
                });
            }
            existing
        }
        None => {
            let entity = world
                .spawn(Ride {
                    state: RideState::Requested,
                    rider: rider.0,
                    driver: None,
                })
                .id();
            world.resource_mut::<RideLog>().0.push(entity);
            if let Some(mut rider_record) = world.get_mut::<Rider>(rider.0) {
                rider_record.active_ride = Some(entity);
            }
            debug!("ride {} requested by rider {rider}", entity.index());
            entity
        }
    };

    let ride_id = RideId(ride_entity);
    match matching::request_match(world, rider)? {
        MatchOutcome::NoDriverAvailable => Ok(RequestOutcome::NoDriverAvailable { ride: ride_id }),
        MatchOutcome::Matched(driver) => {
            bind_match(world, ride_entity, driver);
            debug!("ride {ride_id} matched with driver {driver}");
            Ok(RequestOutcome::Matched {
                ride: ride_id,
                driver,
            })
        }
    }
}

fn bind_match(world: &mut World, ride_entity: Entity, driver: DriverId) {
    if let Some(mut ride) = world.get_mut::<Ride>(ride_entity) {
        ride.state = RideState::Matched;
        ride.driver = Some(driver.0);
    }
    if let Some(mut driver_record) = world.get_mut::<Driver>(driver.0) {
        driver_record.active_ride = Some(ride_entity);
    }
}

/// Complete a Matched ride, freeing its driver back to Available.
pub fn complete_ride(world: &mut World, id: RideId) -> Result<(), DispatchError> {
    let record = *ride_record(world, id)?;
    if record.state != RideState::Matched {
        return Err(DispatchError::InvalidTransition {
            ride: id,
            from: record.state,
            action: "complete",
        });
    }
    let Some(driver_entity) = record.driver else {
        // Matched rides always carry a driver; refuse rather than mutate.
        return Err(DispatchError::InvalidTransition {
            ride: id,
            from: record.state,
            action: "complete",
        });
    };

    if let Some(mut ride) = world.get_mut::<Ride>(id.0) {
        ride.state = RideState::Completed;
    }
    release_driver(world, driver_entity);
    clear_rider_backlink(world, record.rider);
    debug!("ride {id} completed");
    Ok(())
}

/// Cancel a Requested or Matched ride; a bound driver goes back to
/// Available.
pub fn cancel_ride(world: &mut World, id: RideId) -> Result<(), DispatchError> {
    let record = *ride_record(world, id)?;
    if record.state.is_terminal() {
        return Err(DispatchError::InvalidTransition {
            ride: id,
            from: record.state,
            action: "cancel",
        });
    }

    if let Some(mut ride) = world.get_mut::<Ride>(id.0) {
        ride.state = RideState::Cancelled;
        // The driver reference is only meaningful for Matched and Completed.
        ride.driver = None;
    }
    if let Some(driver_entity) = record.driver {
        release_driver(world, driver_entity);
    }
    clear_rider_backlink(world, record.rider);
    debug!("ride {id} cancelled");
    Ok(())
}

fn release_driver(world: &mut World, driver_entity: Entity) {
    if let Some(mut driver) = world.get_mut::<Driver>(driver_entity) {
        driver.state = DriverState::Available;
        driver.active_ride = None;
    }
}

fn clear_rider_backlink(world: &mut World, rider_entity: Entity) {
    if let Some(mut rider) = world.get_mut::<Rider>(rider_entity) {
        rider.active_ride = None;
    }
}
