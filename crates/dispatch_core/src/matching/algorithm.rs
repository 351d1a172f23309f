use bevy_ecs::prelude::Entity;

/// Trait for matching policies that pick a driver for a waiting rider.
///
/// The lifecycle state machine stays ignorant of matching policy; swapping
/// in a different selection strategy (e.g. nearest-driver once positions
/// exist) never touches ride-state invariants.
pub trait MatchingAlgorithm: Send + Sync {
    /// Pick a driver for `rider` from `available_drivers`.
    ///
    /// `available_drivers` holds only drivers currently Available, in
    /// registration order. Returns `None` when the policy declines to match,
    /// which the caller reports as "no driver available". A policy may only
    /// claim drivers from the candidate slice; anything else is discarded.
    fn select(&self, rider: Entity, available_drivers: &[Entity]) -> Option<Entity>;
}
