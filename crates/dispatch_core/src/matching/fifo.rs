use bevy_ecs::prelude::Entity;

use super::algorithm::MatchingAlgorithm;

/// First-come-first-served matching: the first Available driver in
/// registration order wins.
///
/// Deterministic and auditable; chosen as the default because no geographic
/// data exists in scope to rank drivers by.
#[derive(Debug, Default)]
pub struct FifoMatching;

impl MatchingAlgorithm for FifoMatching {
    fn select(&self, _rider: Entity, available_drivers: &[Entity]) -> Option<Entity> {
        available_drivers.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_available_driver() {
        let d1 = Entity::from_raw(1);
        let d2 = Entity::from_raw(2);
        let policy = FifoMatching;
        assert_eq!(policy.select(Entity::from_raw(0), &[d1, d2]), Some(d1));
    }

    #[test]
    fn declines_when_pool_is_empty() {
        let policy = FifoMatching;
        assert_eq!(policy.select(Entity::from_raw(0), &[]), None);
    }
}
