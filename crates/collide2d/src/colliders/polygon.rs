//! Convex polygon collider and its axis-aligned box specialization

use std::cell::{Ref, RefCell};

use crate::{
    colliders::assert_scale,
    collision::{self, utils::build_box_points, CollisionResult, RaycastHit},
    error::ColliderError,
    math::{component_max, component_min, perpendicular, RectF, Vec2},
};

#[derive(Debug, Clone)]
struct PolygonCache {
    points: Vec<Vec2>,
    edge_normals: Vec<Vec2>,
    bounding_box: RectF,
    dirty: bool,
}

/// A convex polygon defined by model-space points plus position,
/// rotation, and uniform scale.
///
/// World-space points, edge normals, and the bounding box are derived
/// lazily: setters only mark the collider dirty, and the next geometry
/// access recomputes all three together. The winding of the input points
/// is preserved; edge normals are the normalized perpendiculars of
/// consecutive point pairs, so collision routines that interpret normals
/// as outward-facing expect consistent winding.
#[derive(Debug, Clone)]
pub struct PolygonCollider {
    original_points: Vec<Vec2>,
    original_center: Vec2,
    position: Vec2,
    rotation: f32,
    scale: f32,
    cache: RefCell<PolygonCache>,
}

impl PolygonCollider {
    /// Creates a polygon from model-space points.
    ///
    /// # Errors
    ///
    /// Returns [`ColliderError::TooFewPoints`] when fewer than three
    /// points are supplied.
    pub fn new(points: Vec<Vec2>) -> Result<Self, ColliderError> {
        if points.len() < 3 {
            return Err(ColliderError::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Self::with_points(points))
    }

    pub(crate) fn with_points(points: Vec<Vec2>) -> Self {
        let count = points.len();
        Self {
            original_points: points,
            original_center: Vec2::zeros(),
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: 1.0,
            cache: RefCell::new(PolygonCache {
                points: vec![Vec2::zeros(); count],
                edge_normals: vec![Vec2::zeros(); count],
                bounding_box: RectF::default(),
                dirty: true,
            }),
        }
    }

    // Recomputes world points, edge normals, and the bounding box in one
    // pass. The rotation == 0 branch skips the rotate/translate steps
    // entirely, which keeps unrotated colliders axis-aligned.
    fn clean(&self) {
        if !self.cache.borrow().dirty {
            return;
        }
        let mut cache = self.cache.borrow_mut();
        let cache = &mut *cache;
        cache.dirty = false;

        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);

        if self.rotation == 0.0 {
            for (slot, original) in cache.points.iter_mut().zip(&self.original_points) {
                let p = original * self.scale;
                min = component_min(min, p);
                max = component_max(max, p);
                *slot = p;
            }
        } else {
            let (sin, cos) = self.rotation.sin_cos();
            let center = self.original_center * self.scale;

            for (slot, original) in cache.points.iter_mut().zip(&self.original_points) {
                let mut p = original * self.scale;
                p -= center;
                p = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
                p += center;
                min = component_min(min, p);
                max = component_max(max, p);
                *slot = p;
            }
        }

        let count = cache.points.len();
        for i in 0..count {
            cache.edge_normals[i] =
                perpendicular(cache.points[i], cache.points[(i + 1) % count]).normalize();
        }

        cache.bounding_box = RectF::new(min.x, min.y, max.x - min.x, max.y - min.y);
    }

    /// Current rotation in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Sets the rotation, invalidating derived geometry when it changes.
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

    /// Sets the world position. Position is applied at use time, so this
    /// never invalidates the derived geometry.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotation pivot in world units: the original center scaled.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.original_center * self.scale
    }

    /// Model-space rotation pivot.
    #[must_use]
    pub const fn original_center(&self) -> Vec2 {
        self.original_center
    }

    /// Sets the model-space rotation pivot.
    pub fn set_original_center(&mut self, center: Vec2) {
        if center == self.original_center {
            return;
        }
        self.original_center = center;
        self.cache.get_mut().dirty = true;
    }

    /// Model-space points as supplied at construction.
    #[must_use]
    pub fn original_points(&self) -> &[Vec2] {
        &self.original_points
    }

    pub(crate) fn original_points_mut(&mut self) -> &mut [Vec2] {
        self.cache.get_mut().dirty = true;
        &mut self.original_points
    }

    /// Scaled and rotated points, excluding the position offset.
    ///
    /// The returned borrow must be released before mutating the collider.
    #[must_use]
    pub fn world_points(&self) -> Ref<'_, [Vec2]> {
        self.clean();
        Ref::map(self.cache.borrow(), |c| c.points.as_slice())
    }

    /// Normalized edge perpendiculars, one per point, wrapping around.
    #[must_use]
    pub fn edge_normals(&self) -> Ref<'_, [Vec2]> {
        self.clean();
        Ref::map(self.cache.borrow(), |c| c.edge_normals.as_slice())
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        self.clean();
        let cache = self.cache.borrow();
        let center = self.center();
        RectF::new(
            cache.bounding_box.x + self.position.x - center.x,
            cache.bounding_box.y + self.position.y - center.y,
            cache.bounding_box.w,
            cache.bounding_box.h,
        )
    }

    /// Overlap against a rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        let Some(temp) = collision::box_from_rect(rect) else {
            return false;
        };
        collision::polygon_to_polygon(self, temp.polygon())
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        collision::segment_to_poly(start, end, self)
    }

    /// Point containment.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        collision::point_to_poly(point, self)
    }

    /// Detailed overlap against a rectangle.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<CollisionResult> {
        let temp = collision::box_from_rect(rect)?;
        collision::polygon_to_polygon_ext(self, temp.polygon())
    }

    /// Casts a raw segment against the polygon's edges.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        collision::segment_to_poly_ext(start, end, self)
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        collision::point_to_poly_ext(point, self)
    }
}

/// An axis-aligned (until rotated) rectangle collider.
///
/// Backed by a four-point [`PolygonCollider`]; the unrotated case takes
/// rect-only fast paths in the narrow phase.
#[derive(Debug, Clone)]
pub struct BoxCollider {
    polygon: PolygonCollider,
    size: Vec2,
}

impl BoxCollider {
    /// Creates a box with its top-left corner at the model-space origin.
    ///
    /// # Errors
    ///
    /// Returns [`ColliderError::InvalidSize`] unless both dimensions are
    /// strictly positive.
    pub fn new(width: f32, height: f32) -> Result<Self, ColliderError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(ColliderError::InvalidSize { width, height });
        }
        Ok(Self {
            polygon: PolygonCollider::with_points(build_box_points(width, height).to_vec()),
            size: Vec2::new(width, height),
        })
    }

    // 1x1 box used as the point collider's scaled stand-in.
    pub(crate) fn unit() -> Self {
        Self {
            polygon: PolygonCollider::with_points(build_box_points(1.0, 1.0).to_vec()),
            size: Vec2::new(1.0, 1.0),
        }
    }

    /// The backing polygon, for routines that need raw points.
    #[must_use]
    pub const fn polygon(&self) -> &PolygonCollider {
        &self.polygon
    }

    /// Current rotation in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.polygon.rotation()
    }

    /// Sets the rotation.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.polygon.set_rotation(rotation);
    }

    /// Current uniform scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.polygon.scale()
    }

    /// Sets the uniform scale.
    ///
    /// # Panics
    ///
    /// Panics when `scale` is not strictly positive.
    pub fn set_scale(&mut self, scale: f32) {
        self.polygon.set_scale(scale);
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.polygon.position()
    }

    /// Sets the world position.
    pub fn set_position(&mut self, position: Vec2) {
        self.polygon.set_position(position);
    }

    /// Rotation pivot in world units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.polygon.center()
    }

    /// Model-space rotation pivot.
    #[must_use]
    pub const fn original_center(&self) -> Vec2 {
        self.polygon.original_center()
    }

    /// Sets the model-space rotation pivot.
    pub fn set_original_center(&mut self, center: Vec2) {
        self.polygon.set_original_center(center);
    }

    /// Scaled size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size * self.polygon.scale()
    }

    /// Scaled width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.size.x * self.polygon.scale()
    }

    /// Scaled height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.size.y * self.polygon.scale()
    }

    /// Unscaled size.
    #[must_use]
    pub const fn original_size(&self) -> Vec2 {
        self.size
    }

    /// Replaces the unscaled size, patching the backing polygon's model
    /// points.
    pub fn set_original_size(&mut self, size: Vec2) {
        self.set_size_impl(size.x, size.y);
    }

    /// Unscaled width.
    #[must_use]
    pub fn original_width(&self) -> f32 {
        self.size.x
    }

    /// Replaces the unscaled width.
    pub fn set_original_width(&mut self, width: f32) {
        self.set_size_impl(width, self.size.y);
    }

    /// Unscaled height.
    #[must_use]
    pub fn original_height(&self) -> f32 {
        self.size.y
    }

    /// Replaces the unscaled height.
    pub fn set_original_height(&mut self, height: f32) {
        self.set_size_impl(self.size.x, height);
    }

    fn set_size_impl(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        let points = self.polygon.original_points_mut();
        points[1].x = width;
        points[2] = Vec2::new(width, height);
        points[3].y = height;
    }

    /// Scaled and rotated corner points, excluding the position offset.
    #[must_use]
    pub fn world_points(&self) -> Ref<'_, [Vec2]> {
        self.polygon.world_points()
    }

    /// Normalized edge perpendiculars.
    #[must_use]
    pub fn edge_normals(&self) -> Ref<'_, [Vec2]> {
        self.polygon.edge_normals()
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        self.polygon.bounds()
    }

    /// Overlap against a rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        collision::box_to_rect(self, rect)
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        collision::segment_to_poly(start, end, &self.polygon)
    }

    /// Point containment.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        collision::point_to_box(point, self)
    }

    /// Detailed overlap against a rectangle.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<CollisionResult> {
        collision::box_to_rect_ext(self, rect)
    }

    /// Casts a raw segment against the box's edges.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        collision::segment_to_poly_ext(start, end, &self.polygon)
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        collision::point_to_box_ext(point, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn triangle() -> PolygonCollider {
        PolygonCollider::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_too_few_points() {
        let result = PolygonCollider::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        assert!(matches!(
            result,
            Err(ColliderError::TooFewPoints { count: 2 })
        ));
    }

    #[test]
    fn test_world_points_apply_scale() {
        let mut poly = triangle();
        poly.set_scale(2.0);
        let points = poly.world_points();
        assert_relative_eq!(points[1].x, 20.0);
        assert_relative_eq!(points[2].y, 20.0);
    }

    #[test]
    fn test_world_points_read_is_idempotent() {
        let mut poly = triangle();
        poly.set_rotation(0.3);
        let first: Vec<Vec2> = poly.world_points().to_vec();
        let second: Vec<Vec2> = poly.world_points().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rotation_round_trip_restores_points() {
        let mut poly = triangle();
        let before: Vec<Vec2> = poly.world_points().to_vec();
        poly.set_rotation(FRAC_PI_4);
        let _ = poly.world_points();
        poly.set_rotation(0.0);
        let after: Vec<Vec2> = poly.world_points().to_vec();
        for (b, a) in before.iter().zip(&after) {
            assert_relative_eq!(b.x, a.x, epsilon = 1e-5);
            assert_relative_eq!(b.y, a.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_bounds_follow_position_and_pivot() {
        let mut poly = triangle();
        poly.set_position(Vec2::new(100.0, 50.0));
        let bounds = poly.bounds();
        assert_relative_eq!(bounds.x, 100.0);
        assert_relative_eq!(bounds.y, 50.0);
        assert_relative_eq!(bounds.w, 10.0);
        assert_relative_eq!(bounds.h, 10.0);
    }

    #[test]
    fn test_bounds_contain_rotated_points() {
        let mut collider = BoxCollider::new(10.0, 10.0).unwrap();
        collider.set_original_center(Vec2::new(5.0, 5.0));
        collider.set_rotation(FRAC_PI_4);
        let bounds = collider.bounds();
        for point in collider.world_points().iter() {
            let world = point + collider.position() - collider.center();
            assert!(bounds.contains_point(world));
        }
        // A 45-degree square's AABB is wider than the square itself.
        let expected = 10.0 * std::f32::consts::SQRT_2;
        assert_relative_eq!(bounds.w, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_edge_normals_are_unit_length() {
        let mut poly = triangle();
        poly.set_rotation(1.2);
        for normal in poly.edge_normals().iter() {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_box_rejects_non_positive_size() {
        assert!(BoxCollider::new(0.0, 10.0).is_err());
        assert!(BoxCollider::new(10.0, -1.0).is_err());
    }

    #[test]
    fn test_box_scaled_size_accessors() {
        let mut collider = BoxCollider::new(4.0, 2.0).unwrap();
        collider.set_scale(3.0);
        assert_relative_eq!(collider.width(), 12.0);
        assert_relative_eq!(collider.height(), 6.0);
        assert_relative_eq!(collider.original_width(), 4.0);
    }

    #[test]
    fn test_box_resize_patches_polygon_points() {
        let mut collider = BoxCollider::new(4.0, 2.0).unwrap();
        collider.set_original_size(Vec2::new(8.0, 6.0));
        let points = collider.world_points();
        assert_relative_eq!(points[1].x, 8.0);
        assert_relative_eq!(points[2].x, 8.0);
        assert_relative_eq!(points[2].y, 6.0);
        assert_relative_eq!(points[3].y, 6.0);
    }

    #[test]
    fn test_box_contains_point() {
        let mut collider = BoxCollider::new(32.0, 32.0).unwrap();
        collider.set_position(Vec2::new(0.0, 0.0));
        assert!(collider.contains_point(Vec2::new(16.0, 16.0)));
        assert!(!collider.contains_point(Vec2::new(33.0, 16.0)));
    }

    #[test]
    #[should_panic(expected = "scale")]
    fn test_set_scale_rejects_zero() {
        triangle().set_scale(0.0);
    }
}
