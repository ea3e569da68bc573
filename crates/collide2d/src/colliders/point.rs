//! Point collider

use crate::{
    colliders::{assert_scale, BoxCollider},
    collision::{self, CollisionResult, RaycastHit},
    math::{RectF, Vec2},
};

/// A single-point collider.
///
/// At unit scale the point is a raw coordinate. The first time the scale
/// is set away from 1, the point grows a private 1x1 box collider pivoted
/// on its center (0.5, 0.5), which then stands in for the point in every
/// query. The box persists after the scale returns to 1 but is only
/// consulted while the scale differs from 1.
#[derive(Debug, Clone)]
pub struct PointCollider {
    position: Vec2,
    rotation: f32,
    scale: f32,
    internal_box: Option<Box<BoxCollider>>,
}

impl Default for PointCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCollider {
    /// Creates a point collider at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: 1.0,
            internal_box: None,
        }
    }

    /// True while queries route through the internal box.
    #[must_use]
    pub fn uses_internal_box(&self) -> bool {
        self.scale != 1.0
    }

    // The box consulted by queries, present only while scale != 1.
    pub(crate) fn active_box(&self) -> Option<&BoxCollider> {
        if self.uses_internal_box() {
            self.internal_box.as_deref()
        } else {
            None
        }
    }

    /// Current rotation in radians. Only observable through the internal
    /// box.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Sets the rotation, mirrored into the internal box when present.
    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation == self.rotation {
            return;
        }
        self.rotation = rotation;
        if let Some(b) = &mut self.internal_box {
            b.set_rotation(rotation);
        }
    }

    /// Current uniform scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the uniform scale, creating the internal box on the first
    /// departure from 1.
    ///
    /// # Panics
    ///
    /// Panics when `scale` is not strictly positive.
    pub fn set_scale(&mut self, scale: f32) {
        if scale == self.scale {
            return;
        }
        assert_scale(scale);

        if self.internal_box.is_none() && scale != 1.0 {
            let mut b = BoxCollider::unit();
            b.set_original_center(Vec2::new(0.5, 0.5));
            b.set_rotation(self.rotation);
            b.set_position(self.position);
            self.internal_box = Some(Box::new(b));
        }

        self.scale = scale;
        if let Some(b) = &mut self.internal_box {
            b.set_scale(scale);
        }
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sets the world position, mirrored into the internal box when
    /// present.
    pub fn set_position(&mut self, position: Vec2) {
        if position == self.position {
            return;
        }
        self.position = position;
        if let Some(b) = &mut self.internal_box {
            b.set_position(position);
        }
    }

    /// Bounding box: a 1x1 rect at the position, or the internal box's
    /// bounds while scaled.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        match self.active_box() {
            Some(b) => b.bounds(),
            None => RectF::new(self.position.x, self.position.y, 1.0, 1.0),
        }
    }

    /// Overlap against a rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        match self.active_box() {
            Some(b) => b.overlaps_rect(rect),
            None => collision::point_to_rect(self.position, &rect),
        }
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        match self.active_box() {
            Some(b) => b.overlaps_line(start, end),
            None => collision::point_to_segment(self.position, start, end),
        }
    }

    /// Exact equality at unit scale; box containment while scaled.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self.active_box() {
            Some(b) => b.contains_point(point),
            None => collision::point_to_point(self.position, point),
        }
    }

    /// Detailed overlap against a rectangle.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<CollisionResult> {
        match self.active_box() {
            Some(b) => b.collides_rect(rect),
            None => collision::point_to_rect_ext(self.position, &rect),
        }
    }

    /// Casts a raw segment against the point.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        match self.active_box() {
            Some(b) => b.collides_line(start, end),
            None => {
                let result = collision::point_to_segment_ext(self.position, start, end)?;
                Some(RaycastHit::from_collision(&result, start, end))
            }
        }
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        match self.active_box() {
            Some(b) => b.collides_point(point),
            None => collision::point_to_point_ext(self.position, point),
        }
    }
}
