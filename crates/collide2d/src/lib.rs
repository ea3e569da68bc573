//! # collide2d
//!
//! The collision detection core of a 2D game engine: a typed shape
//! hierarchy (point, line, circle, box, convex polygon) with narrow-phase
//! intersection, overlap, and raycast tests, plus a uniform-grid spatial
//! hash for broad-phase queries.
//!
//! ## Features
//!
//! - **Shape colliders**: five shape kinds behind one [`Collider`] type,
//!   each with rotation, uniform scale, position, and a cached bounding box
//! - **Narrow phase**: pairwise overlap tests with optional detailed
//!   results (contact normal, minimum translation vector, contact point)
//!   and analytic segment raycasts
//! - **Broad phase**: a [`SpatialHash`] mapping grid cells to collider ids,
//!   with incremental membership maintenance and point/rect/collider
//!   queries
//!
//! ## Quick Start
//!
//! ```rust
//! use collide2d::prelude::*;
//!
//! let mut set = ColliderSet::new();
//! let mut hash = SpatialHash::new(64.0).unwrap();
//!
//! let player = set.insert(Collider::circle(10.0));
//! set.get_mut(player).unwrap().set_position(Vec2::new(40.0, 64.0));
//! hash.add(&set, player);
//!
//! let wall = set.insert(Collider::new_box(32.0, 32.0).unwrap());
//! hash.add(&set, wall);
//!
//! if hash.collides_collider(&set, player) {
//!     // resolve using the detailed result from the narrow phase
//! }
//! ```

pub mod collision;
pub mod colliders;
pub mod math;
pub mod spatial_hash;

mod error;

#[cfg(test)]
mod tests;

pub use error::ColliderError;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        colliders::{
            BoxCollider, CircleCollider, Collider, ColliderId, ColliderSet, ColliderShape,
            LineCollider, PointCollider, PolygonCollider,
        },
        collision::{ColliderContact, CollisionResult, RaycastHit},
        math::{RectF, Vec2},
        spatial_hash::SpatialHash,
        ColliderError,
    };
}
