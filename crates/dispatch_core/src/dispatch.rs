//! Dispatch facade: the public entry surface of the core.
//!
//! Owns the dispatch world and forwards to the registry, matcher, and
//! lifecycle manager; the only logic here is shaping results for display.
//! The CLI shell (or any other driver) goes through this type and never
//! touches the world directly.

use bevy_ecs::prelude::{Entity, World};
use serde::Serialize;

use crate::ecs::{DriverId, DriverState, RideId, RideState, RiderId};
use crate::error::DispatchError;
use crate::lifecycle::{self, RequestOutcome};
use crate::matching::{FifoMatching, MatchingAlgorithm, MatchingAlgorithmResource};
use crate::pricing;
use crate::registry::{self, DriverRoster, RideLog};

/// Display-shaped view of a driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStatus {
    pub id: u32,
    pub name: String,
    pub state: DriverState,
}

/// Display-shaped view of a ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideStatus {
    pub id: u32,
    pub state: RideState,
    pub rider: u32,
    pub rider_name: String,
    pub driver: Option<u32>,
    pub driver_name: Option<String>,
}

pub struct Dispatch {
    world: World,
}

impl Dispatch {
    /// Dispatch core with the default FIFO matching policy.
    pub fn new() -> Self {
        Self::with_matching(Box::new(FifoMatching))
    }

    /// Dispatch core with a caller-provided matching policy.
    pub fn with_matching(algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        let mut world = World::new();
        world.insert_resource(DriverRoster::default());
        world.insert_resource(RideLog::default());
        world.insert_resource(MatchingAlgorithmResource::new(algorithm));
        Self { world }
    }

    pub fn register_rider(&mut self, name: &str) -> Result<RiderId, DispatchError> {
        registry::register_rider(&mut self.world, name)
    }

    pub fn register_driver(&mut self, name: &str) -> Result<DriverId, DispatchError> {
        registry::register_driver(&mut self.world, name)
    }

    pub fn request_ride(&mut self, rider: RiderId) -> Result<RequestOutcome, DispatchError> {
        lifecycle::request_ride(&mut self.world, rider)
    }

    pub fn complete_ride(&mut self, ride: RideId) -> Result<RideStatus, DispatchError> {
        lifecycle::complete_ride(&mut self.world, ride)?;
        self.ride_status(ride)
    }

    pub fn cancel_ride(&mut self, ride: RideId) -> Result<RideStatus, DispatchError> {
        lifecycle::cancel_ride(&mut self.world, ride)?;
        self.ride_status(ride)
    }

    pub fn driver_status(&self, id: DriverId) -> Result<DriverStatus, DispatchError> {
        let driver = registry::driver(&self.world, id)?;
        let state = driver.state;
        Ok(DriverStatus {
            id: id.index(),
            name: registry::driver_name(&self.world, id)?.to_string(),
            state,
        })
    }

    pub fn ride_status(&self, id: RideId) -> Result<RideStatus, DispatchError> {
        let record = *lifecycle::ride_record(&self.world, id)?;
        let rider = RiderId(record.rider);
        let driver = record.driver.map(DriverId);
        let driver_name = match driver {
            Some(driver) => Some(registry::driver_name(&self.world, driver)?.to_string()),
            None => None,
        };
        Ok(RideStatus {
            id: id.index(),
            state: record.state,
            rider: rider.index(),
            rider_name: registry::rider_name(&self.world, rider)?.to_string(),
            driver: driver.map(DriverId::index),
            driver_name,
        })
    }

    /// Available drivers in registration order.
    pub fn available_drivers(&self) -> Vec<DriverStatus> {
        registry::available_drivers(&self.world)
            .into_iter()
            .filter_map(|id| self.driver_status(id).ok())
            .collect()
    }

    /// All rides ever requested, in creation order.
    pub fn list_rides(&self) -> Vec<RideStatus> {
        let rides: Vec<Entity> = self.world.resource::<RideLog>().0.clone();
        rides
            .into_iter()
            .filter_map(|entity| self.ride_status(RideId(entity)).ok())
            .collect()
    }

    pub fn fare_quote(&self, distance_km: f64) -> Result<f64, DispatchError> {
        pricing::estimate_fare(distance_km)
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;
    use crate::error::DispatchError;

    fn matched(outcome: RequestOutcome) -> (RideId, DriverId) {
        match outcome {
            RequestOutcome::Matched { ride, driver } => (ride, driver),
            RequestOutcome::NoDriverAvailable { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn one_ride_end_to_end() {
        let mut app = Dispatch::new();
        let rider = app.register_rider("Ana").expect("rider");
        let driver = app.register_driver("Bo").expect("driver");

        let (ride, matched_driver) = matched(app.request_ride(rider).expect("request"));
        assert_eq!(matched_driver, driver);
        assert_eq!(
            app.driver_status(driver).expect("status").state,
            DriverState::Busy
        );

        let status = app.complete_ride(ride).expect("complete");
        assert_eq!(status.state, RideState::Completed);
        assert_eq!(status.driver, Some(driver.index()));
        assert_eq!(status.driver_name.as_deref(), Some("Bo"));
        assert_eq!(
            app.driver_status(driver).expect("status").state,
            DriverState::Available
        );
    }

    #[test]
    fn fifo_tie_break_prefers_the_earlier_registration() {
        let mut app = Dispatch::new();
        let rider = app.register_rider("Ana").expect("rider");
        let d1 = app.register_driver("First").expect("driver");
        let _d2 = app.register_driver("Second").expect("driver");

        let (_, matched_driver) = matched(app.request_ride(rider).expect("request"));
        assert_eq!(matched_driver, d1);
    }

    #[test]
    fn contended_driver_is_rematched_after_cancel() {
        let mut app = Dispatch::new();
        let r1 = app.register_rider("Ana").expect("rider");
        let r2 = app.register_rider("Cid").expect("rider");
        let driver = app.register_driver("Bo").expect("driver");

        let (ride1, matched_driver) = matched(app.request_ride(r1).expect("request"));
        assert_eq!(matched_driver, driver);

        let RequestOutcome::NoDriverAvailable { .. } = app.request_ride(r2).expect("request")
        else {
            panic!("pool should be empty");
        };

        app.cancel_ride(ride1).expect("cancel");
        assert_eq!(
            app.driver_status(driver).expect("status").state,
            DriverState::Available
        );

        let (_, rematched) = matched(app.request_ride(r2).expect("retry"));
        assert_eq!(rematched, driver);
    }

    #[test]
    fn a_driver_never_carries_two_matched_rides() {
        let mut app = Dispatch::new();
        let r1 = app.register_rider("Ana").expect("rider");
        let r2 = app.register_rider("Cid").expect("rider");
        let r3 = app.register_rider("Eve").expect("rider");
        let driver = app.register_driver("Bo").expect("driver");

        matched(app.request_ride(r1).expect("request"));
        app.request_ride(r2).expect("request");
        app.request_ride(r3).expect("request");

        let matched_rides = app
            .list_rides()
            .into_iter()
            .filter(|ride| ride.state == RideState::Matched && ride.driver == Some(driver.index()))
            .count();
        assert_eq!(matched_rides, 1);
    }

    #[test]
    fn ride_history_is_retained_in_creation_order() {
        let mut app = Dispatch::new();
        let r1 = app.register_rider("Ana").expect("rider");
        let r2 = app.register_rider("Cid").expect("rider");
        app.register_driver("Bo").expect("driver");
        app.register_driver("Dee").expect("driver");

        let (ride1, _) = matched(app.request_ride(r1).expect("request"));
        let (ride2, _) = matched(app.request_ride(r2).expect("request"));
        app.complete_ride(ride1).expect("complete");
        app.cancel_ride(ride2).expect("cancel");

        let rides = app.list_rides();
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[0].id, ride1.index());
        assert_eq!(rides[0].state, RideState::Completed);
        assert_eq!(rides[1].id, ride2.index());
        assert_eq!(rides[1].state, RideState::Cancelled);
    }

    #[test]
    fn terminal_transitions_surface_invalid_transition() {
        let mut app = Dispatch::new();
        let rider = app.register_rider("Ana").expect("rider");
        app.register_driver("Bo").expect("driver");

        let (ride, _) = matched(app.request_ride(rider).expect("request"));
        app.cancel_ride(ride).expect("cancel");

        assert!(matches!(
            app.complete_ride(ride),
            Err(DispatchError::InvalidTransition { .. })
        ));
        assert!(matches!(
            app.cancel_ride(ride),
            Err(DispatchError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn fare_quote_uses_the_published_formula() {
        let app = Dispatch::new();
        let fare = app.fare_quote(10.0).expect("quote");
        assert!((fare - (pricing::BASE_FARE + 10.0 * pricing::PER_KM_RATE)).abs() < f64::EPSILON);
    }
}
