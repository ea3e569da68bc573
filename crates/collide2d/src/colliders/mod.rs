//! Shape colliders and their type-erased dispatch
//!
//! Each shape kind is a standalone struct with its own geometry and
//! setters; [`Collider`] wraps one of them behind the [`ColliderShape`]
//! enum together with a user tag, and routes pairwise queries to the
//! canonical narrow-phase routine for the pair. Colliders live in a
//! [`ColliderSet`] arena and are referred to elsewhere (notably by the
//! spatial hash) through stable [`ColliderId`] keys.

mod circle;
mod line;
mod point;
mod polygon;

pub use circle::CircleCollider;
pub use line::LineCollider;
pub use point::PointCollider;
pub use polygon::{BoxCollider, PolygonCollider};

use slotmap::SlotMap;

use crate::{
    collision::{self, ColliderContact, CollisionResult, RaycastHit},
    error::ColliderError,
    math::{RectF, Vec2},
};

// Shared scale precondition; scale multiplies geometry, so zero and
// negative values have no meaning here.
pub(crate) fn assert_scale(scale: f32) {
    assert!(
        scale > f32::EPSILON,
        "collider scale must be positive, got {scale}"
    );
}

/// The shape carried by a [`Collider`].
#[derive(Debug, Clone)]
pub enum ColliderShape {
    /// Single point, optionally scaled into a box
    Point(PointCollider),
    /// Line segment
    Line(LineCollider),
    /// Circle
    Circle(CircleCollider),
    /// Rectangle
    Box(BoxCollider),
    /// Convex polygon
    Polygon(PolygonCollider),
}

// Shape as the narrow phase sees it: a point collider with an active
// internal box dispatches as that box.
enum ShapeView<'a> {
    Point(Vec2),
    Line(&'a LineCollider),
    Circle(&'a CircleCollider),
    Box(&'a BoxCollider),
    Polygon(&'a PolygonCollider),
}

impl ColliderShape {
    fn view(&self) -> ShapeView<'_> {
        match self {
            Self::Point(p) => p
                .active_box()
                .map_or(ShapeView::Point(p.position()), ShapeView::Box),
            Self::Line(l) => ShapeView::Line(l),
            Self::Circle(c) => ShapeView::Circle(c),
            Self::Box(b) => ShapeView::Box(b),
            Self::Polygon(p) => ShapeView::Polygon(p),
        }
    }
}

/// A collider: one shape plus an opaque user tag.
#[derive(Debug, Clone)]
pub struct Collider {
    tag: u64,
    shape: ColliderShape,
}

impl Collider {
    /// Wraps a shape in a collider with tag 0.
    #[must_use]
    pub const fn new(shape: ColliderShape) -> Self {
        Self { tag: 0, shape }
    }

    /// Point collider at the origin.
    #[must_use]
    pub fn point() -> Self {
        Self::new(ColliderShape::Point(PointCollider::new()))
    }

    /// Line collider from model-space endpoints.
    #[must_use]
    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self::new(ColliderShape::Line(LineCollider::new(start, end)))
    }

    /// Circle collider at the origin.
    #[must_use]
    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::Circle(CircleCollider::new(radius)))
    }

    /// Box collider with its top-left corner at its position, initially
    /// the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ColliderError::InvalidSize`] unless both dimensions are
    /// strictly positive.
    pub fn new_box(width: f32, height: f32) -> Result<Self, ColliderError> {
        Ok(Self::new(ColliderShape::Box(BoxCollider::new(
            width, height,
        )?)))
    }

    /// Polygon collider from model-space points.
    ///
    /// # Errors
    ///
    /// Returns [`ColliderError::TooFewPoints`] when fewer than three
    /// points are supplied.
    pub fn polygon(points: Vec<Vec2>) -> Result<Self, ColliderError> {
        Ok(Self::new(ColliderShape::Polygon(PolygonCollider::new(
            points,
        )?)))
    }

    /// Opaque user tag, free for callers to interpret.
    #[must_use]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Sets the user tag.
    pub fn set_tag(&mut self, tag: u64) {
        self.tag = tag;
    }

    /// The wrapped shape.
    #[must_use]
    pub const fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Mutable access to the wrapped shape.
    pub fn shape_mut(&mut self) -> &mut ColliderShape {
        &mut self.shape
    }

    /// Current rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        match &self.shape {
            ColliderShape::Point(p) => p.rotation(),
            ColliderShape::Line(l) => l.rotation(),
            ColliderShape::Circle(c) => c.rotation(),
            ColliderShape::Box(b) => b.rotation(),
            ColliderShape::Polygon(p) => p.rotation(),
        }
    }

    /// Sets the rotation; circles ignore it.
    pub fn set_rotation(&mut self, rotation: f32) {
        match &mut self.shape {
            ColliderShape::Point(p) => p.set_rotation(rotation),
            ColliderShape::Line(l) => l.set_rotation(rotation),
            ColliderShape::Circle(c) => c.set_rotation(rotation),
            ColliderShape::Box(b) => b.set_rotation(rotation),
            ColliderShape::Polygon(p) => p.set_rotation(rotation),
        }
    }

    /// Current uniform scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        match &self.shape {
            ColliderShape::Point(p) => p.scale(),
            ColliderShape::Line(l) => l.scale(),
            ColliderShape::Circle(c) => c.scale(),
            ColliderShape::Box(b) => b.scale(),
            ColliderShape::Polygon(p) => p.scale(),
        }
    }

    /// Sets the uniform scale.
    ///
    /// # Panics
    ///
    /// Panics when `scale` is not strictly positive.
    pub fn set_scale(&mut self, scale: f32) {
        match &mut self.shape {
            ColliderShape::Point(p) => p.set_scale(scale),
            ColliderShape::Line(l) => l.set_scale(scale),
            ColliderShape::Circle(c) => c.set_scale(scale),
            ColliderShape::Box(b) => b.set_scale(scale),
            ColliderShape::Polygon(p) => p.set_scale(scale),
        }
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        match &self.shape {
            ColliderShape::Point(p) => p.position(),
            ColliderShape::Line(l) => l.position(),
            ColliderShape::Circle(c) => c.position(),
            ColliderShape::Box(b) => b.position(),
            ColliderShape::Polygon(p) => p.position(),
        }
    }

    /// Sets the world position.
    pub fn set_position(&mut self, position: Vec2) {
        match &mut self.shape {
            ColliderShape::Point(p) => p.set_position(position),
            ColliderShape::Line(l) => l.set_position(position),
            ColliderShape::Circle(c) => c.set_position(position),
            ColliderShape::Box(b) => b.set_position(position),
            ColliderShape::Polygon(p) => p.set_position(position),
        }
    }

    /// World-space axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> RectF {
        match &self.shape {
            ColliderShape::Point(p) => p.bounds(),
            ColliderShape::Line(l) => l.bounds(),
            ColliderShape::Circle(c) => c.bounds(),
            ColliderShape::Box(b) => b.bounds(),
            ColliderShape::Polygon(p) => p.bounds(),
        }
    }

    /// Overlap against a rectangle.
    #[must_use]
    pub fn overlaps_rect(&self, rect: RectF) -> bool {
        match &self.shape {
            ColliderShape::Point(p) => p.overlaps_rect(rect),
            ColliderShape::Line(l) => l.overlaps_rect(rect),
            ColliderShape::Circle(c) => c.overlaps_rect(rect),
            ColliderShape::Box(b) => b.overlaps_rect(rect),
            ColliderShape::Polygon(p) => p.overlaps_rect(rect),
        }
    }

    /// Overlap against a raw segment.
    #[must_use]
    pub fn overlaps_line(&self, start: Vec2, end: Vec2) -> bool {
        match &self.shape {
            ColliderShape::Point(p) => p.overlaps_line(start, end),
            ColliderShape::Line(l) => l.overlaps_line(start, end),
            ColliderShape::Circle(c) => c.overlaps_line(start, end),
            ColliderShape::Box(b) => b.overlaps_line(start, end),
            ColliderShape::Polygon(p) => p.overlaps_line(start, end),
        }
    }

    /// Point containment.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        match &self.shape {
            ColliderShape::Point(p) => p.contains_point(point),
            ColliderShape::Line(l) => l.contains_point(point),
            ColliderShape::Circle(c) => c.contains_point(point),
            ColliderShape::Box(b) => b.contains_point(point),
            ColliderShape::Polygon(p) => p.contains_point(point),
        }
    }

    /// Detailed overlap against a rectangle; line colliders report a ray
    /// hit against the rectangle border.
    #[must_use]
    pub fn collides_rect(&self, rect: RectF) -> Option<ColliderContact> {
        match &self.shape {
            ColliderShape::Point(p) => p.collides_rect(rect).map(ColliderContact::Overlap),
            ColliderShape::Line(l) => l.collides_rect(rect).map(ColliderContact::Ray),
            ColliderShape::Circle(c) => c.collides_rect(rect).map(ColliderContact::Overlap),
            ColliderShape::Box(b) => b.collides_rect(rect).map(ColliderContact::Overlap),
            ColliderShape::Polygon(p) => p.collides_rect(rect).map(ColliderContact::Overlap),
        }
    }

    /// Casts a raw segment against the collider.
    #[must_use]
    pub fn collides_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        match &self.shape {
            ColliderShape::Point(p) => p.collides_line(start, end),
            ColliderShape::Line(l) => l.collides_line(start, end),
            ColliderShape::Circle(c) => c.collides_line(start, end),
            ColliderShape::Box(b) => b.collides_line(start, end),
            ColliderShape::Polygon(p) => p.collides_line(start, end),
        }
    }

    /// Detailed containment test for a point.
    #[must_use]
    pub fn collides_point(&self, point: Vec2) -> Option<CollisionResult> {
        match &self.shape {
            ColliderShape::Point(p) => p.collides_point(point),
            ColliderShape::Line(l) => l.collides_point(point),
            ColliderShape::Circle(c) => c.collides_point(point),
            ColliderShape::Box(b) => b.collides_point(point),
            ColliderShape::Polygon(p) => p.collides_point(point),
        }
    }

    /// Boolean pairwise overlap test.
    ///
    /// Symmetric: argument order never changes the answer.
    #[must_use]
    pub fn overlaps_collider(&self, other: &Self) -> bool {
        use ShapeView::{Box, Circle, Line, Point, Polygon};

        match (self.shape.view(), other.shape.view()) {
            (Point(a), Point(b)) => collision::point_to_point(a, b),
            (Point(p), Line(l)) | (Line(l), Point(p)) => collision::point_to_line(p, l),
            (Point(p), Circle(c)) | (Circle(c), Point(p)) => collision::point_to_circle(p, c),
            (Point(p), Box(b)) | (Box(b), Point(p)) => collision::point_to_box(p, b),
            (Point(p), Polygon(poly)) | (Polygon(poly), Point(p)) => {
                collision::point_to_poly(p, poly)
            }
            (Line(a), Line(b)) => collision::line_to_line(a, b),
            (Line(l), Circle(c)) | (Circle(c), Line(l)) => collision::line_to_circle(l, c),
            (Line(l), Box(b)) | (Box(b), Line(l)) => collision::line_to_poly(l, b.polygon()),
            (Line(l), Polygon(p)) | (Polygon(p), Line(l)) => collision::line_to_poly(l, p),
            (Circle(a), Circle(b)) => collision::circle_to_circle(a, b),
            (Circle(c), Box(b)) | (Box(b), Circle(c)) => collision::circle_to_box(c, b),
            (Circle(c), Polygon(p)) | (Polygon(p), Circle(c)) => {
                collision::circle_to_polygon(c, p)
            }
            (Box(a), Box(b)) => collision::box_to_box(a, b),
            (Box(b), Polygon(p)) | (Polygon(p), Box(b)) => {
                collision::polygon_to_polygon(b.polygon(), p)
            }
            (Polygon(a), Polygon(b)) => collision::polygon_to_polygon(a, b),
        }
    }

    /// Detailed pairwise collision test.
    ///
    /// Each pair routes to one canonical routine; when `self` sits on the
    /// non-canonical side, the result is inverted so normals and MTVs are
    /// always expressed from `self`'s perspective. Pairs involving a line
    /// produce a [`ColliderContact::Ray`] and are reported identically
    /// from both sides.
    #[must_use]
    pub fn collides_collider(&self, other: &Self) -> Option<ColliderContact> {
        use ColliderContact::{Overlap, Ray};
        use ShapeView::{Box, Circle, Line, Point, Polygon};

        match (self.shape.view(), other.shape.view()) {
            (Point(a), Point(b)) => collision::point_to_point_ext(a, b).map(Overlap),
            (Point(p), Circle(c)) => collision::point_to_circle_ext(p, c).map(Overlap),
            (Circle(c), Point(p)) => {
                collision::point_to_circle_ext(p, c).map(|r| Overlap(r.inverted()))
            }
            (Point(p), Box(b)) => collision::point_to_box_ext(p, b).map(Overlap),
            (Box(b), Point(p)) => collision::point_to_box_ext(p, b).map(|r| Overlap(r.inverted())),
            (Point(p), Polygon(poly)) => collision::point_to_poly_ext(p, poly).map(Overlap),
            (Polygon(poly), Point(p)) => {
                collision::point_to_poly_ext(p, poly).map(|r| Overlap(r.inverted()))
            }
            (Point(p), Line(l)) => collision::point_to_line_ext(p, l).map(Overlap),
            (Line(l), Point(p)) => {
                collision::point_to_line_ext(p, l).map(|r| Overlap(r.inverted()))
            }
            (Line(a), Line(b)) => collision::line_to_line_ext(a, b).map(Overlap),
            (Line(l), Circle(c)) | (Circle(c), Line(l)) => {
                collision::line_to_circle_ext(l, c).map(Ray)
            }
            (Line(l), Box(b)) | (Box(b), Line(l)) => {
                collision::line_to_poly_ext(l, b.polygon()).map(Ray)
            }
            (Line(l), Polygon(p)) | (Polygon(p), Line(l)) => {
                collision::line_to_poly_ext(l, p).map(Ray)
            }
            (Circle(a), Circle(b)) => collision::circle_to_circle_ext(a, b).map(Overlap),
            (Circle(c), Box(b)) => collision::circle_to_box_ext(c, b).map(Overlap),
            (Box(b), Circle(c)) => {
                collision::circle_to_box_ext(c, b).map(|r| Overlap(r.inverted()))
            }
            (Circle(c), Polygon(p)) => collision::circle_to_polygon_ext(c, p).map(Overlap),
            (Polygon(p), Circle(c)) => {
                collision::circle_to_polygon_ext(c, p).map(|r| Overlap(r.inverted()))
            }
            (Box(a), Box(b)) => collision::box_to_box_ext(a, b).map(Overlap),
            (Box(b), Polygon(p)) => {
                collision::polygon_to_polygon_ext(b.polygon(), p).map(Overlap)
            }
            (Polygon(p), Box(b)) => {
                collision::polygon_to_polygon_ext(p, b.polygon()).map(Overlap)
            }
            (Polygon(a), Polygon(b)) => collision::polygon_to_polygon_ext(a, b).map(Overlap),
        }
    }
}

slotmap::new_key_type! {
    /// Stable handle to a collider stored in a [`ColliderSet`].
    pub struct ColliderId;
}

/// Arena owning collider data.
///
/// The spatial hash and other collaborators hold only [`ColliderId`]s;
/// removing a collider from the set invalidates its id everywhere at
/// once.
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    colliders: SlotMap<ColliderId, Collider>,
}

impl ColliderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collider, returning its stable id.
    pub fn insert(&mut self, collider: Collider) -> ColliderId {
        self.colliders.insert(collider)
    }

    /// Removes a collider, returning it if the id was live.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(id)
    }

    /// Borrows a collider.
    #[must_use]
    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Mutably borrows a collider.
    pub fn get_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id)
    }

    /// True when `id` refers to a live collider.
    #[must_use]
    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.contains_key(id)
    }

    /// Iterates over ids and colliders.
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders.iter()
    }

    /// Number of live colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// True when the set holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}
