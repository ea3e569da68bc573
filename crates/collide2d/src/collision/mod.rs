//! Narrow-phase collision tests and their result types
//!
//! Every test comes in two flavors: a boolean form that answers "do these
//! touch?" and an `_ext` form returning `Option<CollisionResult>` (or
//! [`Option<RaycastHit>`](RaycastHit) for segment casts) with the contact
//! normal, minimum translation vector, and contact point. `None` always
//! means "no collision", never an error.

pub mod utils;

mod narrow;

pub use narrow::*;

use crate::math::{distance, Vec2};

/// Detailed result of an overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    /// Unit vector pointing from the second shape toward the first
    pub normal: Vec2,
    /// Smallest translation that separates the first shape from the second
    pub minimum_translation_vector: Vec2,
    /// Representative contact point
    pub point: Vec2,
}

impl CollisionResult {
    /// Flips the result to describe the collision from the other shape's
    /// perspective.
    pub fn invert(&mut self) {
        self.normal = -self.normal;
        self.minimum_translation_vector = -self.minimum_translation_vector;
    }

    /// Returns an inverted copy, leaving `self` untouched.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.invert();
        self
    }
}

/// Result of casting a segment against a shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaycastHit {
    /// Fraction of the segment traveled before impact, in [0, 1]
    pub fraction: f32,
    /// Distance from the segment start to the impact point
    pub distance: f32,
    /// Impact point in world space
    pub point: Vec2,
    /// Surface normal at the impact point
    pub normal: Vec2,
}

impl RaycastHit {
    /// Builds a hit from an overlap result, for pairs (point vs line,
    /// line vs line) where the narrow phase produces a contact rather
    /// than a true ray intersection.
    #[must_use]
    pub fn from_collision(result: &CollisionResult, start: Vec2, end: Vec2) -> Self {
        let dist = distance(start, result.point);
        let length = distance(start, end);
        Self {
            fraction: if length > 0.0 { dist / length } else { 0.0 },
            distance: dist,
            point: result.point,
            normal: result.normal,
        }
    }
}

/// Contact produced by pairwise collider dispatch.
///
/// Pairs involving a line collider report a [`RaycastHit`]; every other
/// pair reports an overlap with a translation vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderContact {
    /// Overlap with separation data
    Overlap(CollisionResult),
    /// Segment intersection
    Ray(RaycastHit),
}
