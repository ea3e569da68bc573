//! Cross-module scenario tests
//!
//! These exercise the public surface end to end: colliders dispatched
//! through [`crate::colliders::Collider`] and tracked by a
//! [`crate::spatial_hash::SpatialHash`]. Unit tests for individual
//! routines live next to their modules.

mod collision_scenarios;
mod spatial_hash_scenarios;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
