//! Entity registry: owns rider and driver records inside the dispatch world.
//!
//! Riders and drivers are spawned as entities and never despawned, so entity
//! indices double as stable, monotonic public identifiers. Registration order
//! of drivers is tracked in [`DriverRoster`] to back the FIFO matching
//! policy.

use bevy_ecs::prelude::{Entity, Resource, World};
use log::debug;

use crate::ecs::{DisplayName, Driver, DriverId, DriverState, Rider, RiderId};
use crate::error::{DispatchError, EntityKind};

/// Driver entities in registration order.
#[derive(Debug, Default, Resource)]
pub struct DriverRoster(pub(crate) Vec<Entity>);

/// Ride entities in creation order, retained for history.
#[derive(Debug, Default, Resource)]
pub struct RideLog(pub(crate) Vec<Entity>);

fn validated_name(name: &str) -> Result<String, DispatchError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::Validation(
            "name must not be empty or blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn register_rider(world: &mut World, name: &str) -> Result<RiderId, DispatchError> {
    let name = validated_name(name)?;
    let entity = world
        .spawn((Rider { active_ride: None }, DisplayName(name.clone())))
        .id();
    debug!("registered rider {} ({name})", entity.index());
    Ok(RiderId(entity))
}

pub fn register_driver(world: &mut World, name: &str) -> Result<DriverId, DispatchError> {
    let name = validated_name(name)?;
    let entity = world
        .spawn((
            Driver {
                state: DriverState::Available,
                active_ride: None,
            },
            DisplayName(name.clone()),
        ))
        .id();
    world.resource_mut::<DriverRoster>().0.push(entity);
    debug!("registered driver {} ({name})", entity.index());
    Ok(DriverId(entity))
}

pub fn rider(world: &World, id: RiderId) -> Result<&Rider, DispatchError> {
    world.get::<Rider>(id.0).ok_or(DispatchError::NotFound {
        kind: EntityKind::Rider,
        id: id.index(),
    })
}

pub fn driver(world: &World, id: DriverId) -> Result<&Driver, DispatchError> {
    world.get::<Driver>(id.0).ok_or(DispatchError::NotFound {
        kind: EntityKind::Driver,
        id: id.index(),
    })
}

pub fn rider_name(world: &World, id: RiderId) -> Result<&str, DispatchError> {
    rider(world, id)?;
    let name = world
        .get::<DisplayName>(id.0)
        .ok_or(DispatchError::NotFound {
            kind: EntityKind::Rider,
            id: id.index(),
        })?;
    Ok(&name.0)
}

pub fn driver_name(world: &World, id: DriverId) -> Result<&str, DispatchError> {
    driver(world, id)?;
    let name = world
        .get::<DisplayName>(id.0)
        .ok_or(DispatchError::NotFound {
            kind: EntityKind::Driver,
            id: id.index(),
        })?;
    Ok(&name.0)
}

/// Available drivers in registration order.
pub fn available_drivers(world: &World) -> Vec<DriverId> {
    world
        .resource::<DriverRoster>()
        .0
        .iter()
        .copied()
        .filter(|&entity| {
            world
                .get::<Driver>(entity)
                .is_some_and(|driver| driver.state == DriverState::Available)
        })
        .map(DriverId)
        .collect()
}

pub(crate) fn set_driver_state(
    world: &mut World,
    id: DriverId,
    state: DriverState,
) -> Result<(), DispatchError> {
    let mut driver = world
        .get_mut::<Driver>(id.0)
        .ok_or(DispatchError::NotFound {
            kind: EntityKind::Driver,
            id: id.index(),
        })?;
    driver.state = state;
    Ok(())
}
