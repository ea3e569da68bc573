//! Line segment collider

use std::cell::RefCell;

use crate::{
    colliders::assert_scale,
    collision::{self, CollisionResult, RaycastHit},
    math::{component_max, component_min, RectF, Vec2},
};

#[derive(Debug, Clone)]
struct LineCache {
    start: Vec2,
    end: Vec2,
    pivot: Vec2,
    bounding_box: RectF,
    dirty: bool,
}

/// A line segment collider with model-space endpoints, a rotation pivot,
/// position, rotation, and uniform scale.
///
/// Like the polygon collider, derived world geometry is cleaned lazily.
/// The cached `start`/`end` exclude the position offset;
/// [`adjusted_start`](Self::adjusted_start) and
/// [`adjusted_end`](Self::adjusted_end) include it and are what the
/// narrow phase consumes.
#[derive(Debug, Clone)]
pub struct LineCollider {
    original_start: Vec2,
    original_end: Vec2,
    original_pivot: Vec2,
    position: Vec2,
    rotation: f32,
    scale: f32,
    cache: RefCell<LineCache>,
}

impl LineCollider {
    /// Creates a line from model-space endpoints, pivoting about the
    /// segment midpoint. Use
    /// [`set_original_pivot`](Self::set_original_pivot) for a different
    /// rotation center.
    #[must_use]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            original_start: start,
            original_end: end,
            original_pivot: (start + end) * 0.5,
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: 1.0,
            cache: RefCell::new(LineCache {
                start: Vec2::zeros(),
                end: Vec2::zeros(),
                pivot: Vec2::zeros(),
                bounding_box: RectF::default(),
                dirty: true,
            }),
        }
    }

    fn clean(&self) {
        if !self.cache.borrow().dirty {
            return;
        }
        let mut cache = self.cache.borrow_mut();
        cache.dirty = false;

        let mut start = self.original_start * self.scale;
        let mut end = self.original_end * self.scale;
        let pivot = self.original_pivot * self.scale;

        if self.rotation != 0.0 {
            let (sin, cos) = self.rotation.sin_cos();

            start -= pivot;
            start = Vec2::new(start.x * cos - start.y * sin, start.x * sin + start.y * cos);
            start += pivot;

            end -= pivot;
            end = Vec2::new(end.x * cos - end.y * sin, end.x * sin + end.y * cos);
            end += pivot;
        }

        cache.start = start;
        cache.end = end;
        cache.pivot = pivot;

        let top_left = component_min(start, end);
        let bottom_right = component_max(start, end);
        cache.bounding_box = RectF::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        );
    }

    /// Current rotation in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Sets the rotation.
    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation == self.rotation {
            return;
        }
        self.rotation = rotation;
        self.cache.get_mut().dirty = true;
    }

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
        self.cache.get_mut().dirty = true;
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sets the world position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Scaled, rotated start point, excluding position.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.clean();
        self.cache.borrow().start
    }

    /// Scaled, rotated end point, excluding position.
    #[must_use]
    pub fn end(&self) -> Vec2 {
        self.clean();
        self.cache.borrow().end
    }

    /// Scaled pivot point.
    #[must_use]
    pub fn pivot(&self) -> Vec2 {
        self.clean();
        self.cache.borrow().pivot
    }

    /// World-space start point.
    #[must_use]
    pub fn adjusted_start(&self) -> Vec2 {
        self.start() + self.position
    }

    /// World-space end point.
    #[must_use]
    pub fn adjusted_end(&self) -> Vec2 {
        self.end() + self.position
    }

    /// Model-space start point.
    #[must_use]
    pub const fn original_start(&self) -> Vec2 {
        self.original_start
    }

    /// Replaces the model-space start point.
    pub fn set_original_start(&mut self, start: Vec2) {
        if start == self.original_start {
            return;
        }
        self.original_start = start;
        self.cache.get_mut().dirty = true;
    }

    /// Model-space end point.
    #[must_use]
    pub const fn original_end(&self) -> Vec2 {
        self.original_end
    }

    /// Replaces the model-space end point.
    pub fn set_original_end(&mut self, end: Vec2) {
        if end == self.original_end {
            return;
        }
        self.original_end = end;
        self.cache.get_mut().dirty = true;
    }

    /// Model-space rotation pivot.
    #[must_use]
    pub const fn original_pivot(&self) -> Vec2 {
        self.original_pivot
    }

    /// Replaces the model-space rotation pivot.
    pub fn set_original_pivot(&mut self, pivot: Vec2) {
        if pivot == self.original_pivot {
            return;
        }
        self.original_pivot = pivot;
        self.cache.get_mut().dirty = true;
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        self.clean();
        let mut bounds = self.cache.borrow().bounding_box;
        bounds.x += self.position.x;
        bounds.y += self.position.y;
        bounds
    }

    /// Overlap against a rectangle: true when the segment crosses the
    /// rectangle border. A segment fully inside the rectangle crosses no
    /// border and reports false.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        let Some(temp) = collision::box_from_rect(rect) else {
            return false;
        };
        collision::line_to_poly(self, temp.polygon())
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        collision::line_to_segment(self, start, end)
    }

    /// Exact point-on-segment test.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        collision::point_to_line(point, self)
    }

    /// Casts the line against the rectangle border.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<RaycastHit> {
        let temp = collision::box_from_rect(rect)?;
        collision::line_to_poly_ext(self, temp.polygon())
    }

    /// Detailed intersection with a raw segment, reported as a ray hit
    /// along the queried segment.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        let result = collision::line_to_segment_ext(self, start, end)?;
        Some(RaycastHit::from_collision(&result, start, end))
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        collision::point_to_line_ext(point, self)
    }
}
