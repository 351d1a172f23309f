pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod lifecycle;
pub mod matching;
pub mod pricing;
pub mod registry;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
