//! Circle collider

use crate::{
    colliders::assert_scale,
    collision::{self, CollisionResult, RaycastHit},
    math::{RectF, Vec2},
};

/// A circle collider with a base radius and uniform scale.
///
/// Circles are rotation-invariant: `rotation()` always reports zero and
/// `set_rotation` is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCollider {
    position: Vec2,
    radius: f32,
    scale: f32,
}

impl CircleCollider {
    /// Creates a circle at the origin.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            position: Vec2::new(0.0, 0.0),
            radius,
            scale: 1.0,
        }
    }

    /// Always zero.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        0.0
    }

    /// No-op; a rotated circle is the same circle.
    pub fn set_rotation(&mut self, _rotation: f32) {}

    /// Current uniform scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the uniform scale.
    ///
    /// # Panics
    ///
    /// Panics when `scale` is not strictly positive.
    pub fn set_scale(&mut self, scale: f32) {
        if scale == self.scale {
            return;
        }
        assert_scale(scale);
        self.scale = scale;
    }

    /// Center position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sets the center position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Effective radius: base radius times scale.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius * self.scale
    }

    /// Unscaled base radius.
    #[must_use]
    pub const fn original_radius(&self) -> f32 {
        self.radius
    }

    /// Replaces the unscaled base radius.
    pub fn set_original_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Square bounding box centered on the circle.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        let radius = self.radius();
        RectF::new(
            self.position.x - radius,
            self.position.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    /// Overlap against a rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        collision::circle_to_rect(self, &rect)
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        collision::segment_to_circle(start, end, self)
    }

    /// Point containment, with the point treated as a unit circle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        collision::point_to_circle(point, self)
    }

    /// Detailed overlap against a rectangle.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<CollisionResult> {
        collision::circle_to_rect_ext(self, &rect)
    }

    /// Casts a raw segment against the circle.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        collision::segment_to_circle_ext(start, end, self)
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        collision::point_to_circle_ext(point, self)
    }
}
