//! Pairwise narrow-phase routines
//!
//! Routines are layered: shape-specific entry points (`circle_to_box`,
//! `point_to_poly`, ...) unwrap collider state and forward to generic
//! kernels working on raw positions, radii, rects, and point slices
//! (`radius_to_rect`, `shape_to_shape`, `segment_to_shape`, ...). The
//! generic kernels are public so callers with raw geometry can use them
//! directly.

use crate::{
    colliders::{BoxCollider, CircleCollider, LineCollider, PolygonCollider},
    collision::{
        utils::{closest_point_on_polygon, closest_point_on_polygon_ext},
        CollisionResult, RaycastHit,
    },
    math::{distance, distance_squared, RectF, Vec2},
};

/// Radius a bare point is given when tested against circles.
const POINT_RADIUS: f32 = 1.0;

// --- circle ---------------------------------------------------------------

/// Two circle colliders overlap.
#[must_use]
pub fn circle_to_circle(first: &CircleCollider, second: &CircleCollider) -> bool {
    radius_to_radius(
        first.position(),
        first.radius(),
        second.position(),
        second.radius(),
    )
}

/// Detailed circle/circle overlap.
#[must_use]
pub fn circle_to_circle_ext(
    first: &CircleCollider,
    second: &CircleCollider,
) -> Option<CollisionResult> {
    radius_to_radius_ext(
        first.position(),
        first.radius(),
        second.position(),
        second.radius(),
    )
}

/// Circle collider vs raw circle.
#[must_use]
pub fn circle_to_radius(circle: &CircleCollider, position: Vec2, radius: f32) -> bool {
    radius_to_radius(circle.position(), circle.radius(), position, radius)
}

/// Detailed circle collider vs raw circle.
#[must_use]
pub fn circle_to_radius_ext(
    circle: &CircleCollider,
    position: Vec2,
    radius: f32,
) -> Option<CollisionResult> {
    radius_to_radius_ext(circle.position(), circle.radius(), position, radius)
}

/// Raw circle vs raw circle: squared distance against summed radii,
/// strictly less than (touching circles do not overlap).
#[must_use]
pub fn radius_to_radius(
    first_position: Vec2,
    first_radius: f32,
    second_position: Vec2,
    second_radius: f32,
) -> bool {
    let dist_squared = distance_squared(first_position, second_position);
    let sum_of_radii = first_radius + second_radius;
    dist_squared < sum_of_radii * sum_of_radii
}

/// Detailed raw circle overlap. The normal points from the second circle
/// toward the first, the contact point sits on the second circle's border,
/// and the MTV moves the first circle out along the negated normal.
#[must_use]
pub fn radius_to_radius_ext(
    first_position: Vec2,
    first_radius: f32,
    second_position: Vec2,
    second_radius: f32,
) -> Option<CollisionResult> {
    let dist_squared = distance_squared(first_position, second_position);
    let sum_of_radii = first_radius + second_radius;
    if dist_squared >= sum_of_radii * sum_of_radii {
        return None;
    }

    let depth = sum_of_radii - dist_squared.sqrt();
    let normal = (first_position - second_position).normalize();
    Some(CollisionResult {
        normal,
        minimum_translation_vector: normal * -depth,
        point: second_position + normal * second_radius,
    })
}

/// Circle vs box, falling back to the polygon path when the box is
/// rotated.
#[must_use]
pub fn circle_to_box(first: &CircleCollider, second: &BoxCollider) -> bool {
    if second.rotation() != 0.0 {
        return circle_to_polygon(first, second.polygon());
    }
    radius_to_rect(first.position(), first.radius(), &second.bounds())
}

/// Detailed circle vs box.
#[must_use]
pub fn circle_to_box_ext(first: &CircleCollider, second: &BoxCollider) -> Option<CollisionResult> {
    if second.rotation() != 0.0 {
        return circle_to_polygon_ext(first, second.polygon());
    }
    radius_to_rect_ext(first.position(), first.radius(), &second.bounds())
}

/// Circle collider vs rectangle.
#[must_use]
pub fn circle_to_rect(first: &CircleCollider, second: &RectF) -> bool {
    radius_to_rect(first.position(), first.radius(), second)
}

/// Detailed circle collider vs rectangle.
#[must_use]
pub fn circle_to_rect_ext(first: &CircleCollider, second: &RectF) -> Option<CollisionResult> {
    radius_to_rect_ext(first.position(), first.radius(), second)
}

/// Raw circle vs rectangle via the clamped closest point.
#[must_use]
pub fn radius_to_rect(position: Vec2, radius: f32, rect: &RectF) -> bool {
    let point = rect.closest_point_to(position);
    distance_squared(point, position) <= radius * radius
}

/// Detailed raw circle vs rectangle.
///
/// A circle whose center is inside the rect is pushed out through the
/// nearest border along that border's normal; otherwise the penetration
/// depth comes from the closest border point, with a center exactly on the
/// border pushed a full radius along the border normal.
#[must_use]
pub fn radius_to_rect_ext(position: Vec2, radius: f32, rect: &RectF) -> Option<CollisionResult> {
    let (border_point, border_normal) = rect.closest_point_on_border_to(position);

    if rect.contains_point(position) {
        let safe_point = border_point + border_normal * radius;
        return Some(CollisionResult {
            normal: border_normal,
            minimum_translation_vector: position - safe_point,
            point: border_point,
        });
    }

    let dist_squared = distance_squared(border_point, position);
    if dist_squared == 0.0 {
        return Some(CollisionResult {
            normal: border_normal,
            minimum_translation_vector: border_normal * radius,
            point: border_point,
        });
    }
    if dist_squared <= radius * radius {
        let offset = position - border_point;
        let depth = offset.norm() - radius;
        let normal = offset.normalize();
        return Some(CollisionResult {
            normal,
            minimum_translation_vector: normal * depth,
            point: border_point,
        });
    }

    None
}

/// Circle vs polygon.
#[must_use]
pub fn circle_to_polygon(first: &CircleCollider, second: &PolygonCollider) -> bool {
    radius_to_polygon(first.position(), first.radius(), second)
}

/// Detailed circle vs polygon.
#[must_use]
pub fn circle_to_polygon_ext(
    first: &CircleCollider,
    second: &PolygonCollider,
) -> Option<CollisionResult> {
    radius_to_polygon_ext(first.position(), first.radius(), second)
}

/// Raw circle vs polygon collider.
#[must_use]
pub fn radius_to_polygon(position: Vec2, radius: f32, second: &PolygonCollider) -> bool {
    let shape_position = second.position() - second.center();
    let points = second.world_points();
    radius_to_shape(position, radius, &points, shape_position)
}

/// Detailed raw circle vs polygon collider.
#[must_use]
pub fn radius_to_polygon_ext(
    position: Vec2,
    radius: f32,
    second: &PolygonCollider,
) -> Option<CollisionResult> {
    let shape_position = second.position() - second.center();
    let points = second.world_points();
    radius_to_shape_ext(position, radius, &points, shape_position)
}

/// Raw circle vs point slice at `shape_position`.
#[must_use]
pub fn radius_to_shape(position: Vec2, radius: f32, points: &[Vec2], shape_position: Vec2) -> bool {
    let offset = position - shape_position;
    if point_in_shape(offset, points) {
        return true;
    }
    let (_, dist_squared) = closest_point_on_polygon(points, offset);
    dist_squared <= radius * radius
}

/// Detailed raw circle vs point slice.
#[must_use]
pub fn radius_to_shape_ext(
    position: Vec2,
    radius: f32,
    points: &[Vec2],
    shape_position: Vec2,
) -> Option<CollisionResult> {
    let offset = position - shape_position;
    let (closest, dist_squared, normal) = closest_point_on_polygon_ext(points, offset);

    let center_in_shape = point_in_shape(offset, points);
    if dist_squared > radius * radius && !center_in_shape {
        return None;
    }

    let minimum_translation_vector = if center_in_shape {
        normal * (dist_squared.sqrt() - radius)
    } else if dist_squared == 0.0 {
        normal * radius
    } else {
        let true_distance = dist_squared.sqrt();
        -(offset - closest) * ((radius - true_distance) / true_distance)
    };

    Some(CollisionResult {
        normal,
        minimum_translation_vector,
        point: closest + shape_position,
    })
}

// --- polygon / SAT --------------------------------------------------------

/// Two polygon colliders overlap (separating axis test).
#[must_use]
pub fn polygon_to_polygon(first: &PolygonCollider, second: &PolygonCollider) -> bool {
    let first_points = first.world_points();
    let first_normals = first.edge_normals();
    let first_position = first.position() - first.center();

    let second_points = second.world_points();
    let second_normals = second.edge_normals();
    let second_position = second.position() - second.center();

    shape_to_shape(
        &first_points,
        &first_normals,
        first_position,
        &second_points,
        &second_normals,
        second_position,
    )
}

/// Detailed polygon/polygon overlap.
#[must_use]
pub fn polygon_to_polygon_ext(
    first: &PolygonCollider,
    second: &PolygonCollider,
) -> Option<CollisionResult> {
    let first_points = first.world_points();
    let first_normals = first.edge_normals();
    let first_position = first.position() - first.center();

    let second_points = second.world_points();
    let second_normals = second.edge_normals();
    let second_position = second.position() - second.center();

    shape_to_shape_ext(
        &first_points,
        &first_normals,
        first_position,
        &second_points,
        &second_normals,
        second_position,
    )
}

/// Polygon collider vs raw point slice.
#[must_use]
pub fn polygon_to_shape(
    first: &PolygonCollider,
    points: &[Vec2],
    edge_normals: &[Vec2],
    shape_position: Vec2,
) -> bool {
    let first_points = first.world_points();
    let first_normals = first.edge_normals();
    let first_position = first.position() - first.center();

    shape_to_shape(
        &first_points,
        &first_normals,
        first_position,
        points,
        edge_normals,
        shape_position,
    )
}

/// Detailed polygon collider vs raw point slice.
#[must_use]
pub fn polygon_to_shape_ext(
    first: &PolygonCollider,
    points: &[Vec2],
    edge_normals: &[Vec2],
    shape_position: Vec2,
) -> Option<CollisionResult> {
    let first_points = first.world_points();
    let first_normals = first.edge_normals();
    let first_position = first.position() - first.center();

    shape_to_shape_ext(
        &first_points,
        &first_normals,
        first_position,
        points,
        edge_normals,
        shape_position,
    )
}

fn interval(axis: Vec2, points: &[Vec2]) -> (f32, f32) {
    let mut min = points[0].dot(&axis);
    let mut max = min;
    for p in &points[1..] {
        let dot = p.dot(&axis);
        if dot < min {
            min = dot;
        }
        if dot > max {
            max = dot;
        }
    }
    (min, max)
}

fn interval_distance(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> f32 {
    if min_a < min_b {
        min_b - max_a
    } else {
        min_a - max_b
    }
}

/// Separating axis test over two raw convex shapes.
///
/// Projects both point sets onto the union of both edge-normal sets; the
/// first shape's interval is shifted by the projected position offset. A
/// non-negative interval distance on any axis separates the shapes.
#[must_use]
pub fn shape_to_shape(
    first_points: &[Vec2],
    first_edge_normals: &[Vec2],
    first_position: Vec2,
    second_points: &[Vec2],
    second_edge_normals: &[Vec2],
    second_position: Vec2,
) -> bool {
    let offset = first_position - second_position;

    for axis in first_edge_normals.iter().chain(second_edge_normals) {
        let (mut min_a, mut max_a) = interval(*axis, first_points);
        let (min_b, max_b) = interval(*axis, second_points);

        let relative_interval_offset = offset.dot(axis);
        min_a += relative_interval_offset;
        max_a += relative_interval_offset;

        if interval_distance(min_a, max_a, min_b, max_b) >= 0.0 {
            return false;
        }
    }

    true
}

/// Detailed separating axis test, tracking the minimum-overlap axis.
///
/// The winning axis is flipped to point from the second shape toward the
/// first; the MTV moves the first shape out along the negated axis.
#[must_use]
pub fn shape_to_shape_ext(
    first_points: &[Vec2],
    first_edge_normals: &[Vec2],
    first_position: Vec2,
    second_points: &[Vec2],
    second_edge_normals: &[Vec2],
    second_position: Vec2,
) -> Option<CollisionResult> {
    let offset = first_position - second_position;
    let mut translation_axis = Vec2::zeros();
    let mut min_interval_distance = f32::MAX;

    for axis in first_edge_normals.iter().chain(second_edge_normals) {
        let (mut min_a, mut max_a) = interval(*axis, first_points);
        let (min_b, max_b) = interval(*axis, second_points);

        let relative_interval_offset = offset.dot(axis);
        min_a += relative_interval_offset;
        max_a += relative_interval_offset;

        let dist = interval_distance(min_a, max_a, min_b, max_b);
        if dist >= 0.0 {
            return None;
        }

        let overlap = -dist;
        if overlap < min_interval_distance {
            min_interval_distance = overlap;
            translation_axis = *axis;
            if translation_axis.dot(&offset) < 0.0 {
                translation_axis = -translation_axis;
            }
        }
    }

    Some(CollisionResult {
        normal: translation_axis,
        minimum_translation_vector: -translation_axis * min_interval_distance,
        point: Vec2::zeros(),
    })
}

// --- box / rect -----------------------------------------------------------

/// Two box colliders overlap; both unrotated boxes use the AABB fast
/// path, anything rotated falls back to the polygon test.
#[must_use]
pub fn box_to_box(first: &BoxCollider, second: &BoxCollider) -> bool {
    if first.rotation() != 0.0 || second.rotation() != 0.0 {
        return polygon_to_polygon(first.polygon(), second.polygon());
    }
    rect_to_rect(&first.bounds(), &second.bounds())
}

/// Detailed box/box overlap.
#[must_use]
pub fn box_to_box_ext(first: &BoxCollider, second: &BoxCollider) -> Option<CollisionResult> {
    if first.rotation() != 0.0 || second.rotation() != 0.0 {
        return polygon_to_polygon_ext(first.polygon(), second.polygon());
    }
    rect_to_rect_ext(&first.bounds(), &second.bounds())
}

/// Box collider vs rectangle.
#[must_use]
pub fn box_to_rect(first: &BoxCollider, second: RectF) -> bool {
    if first.rotation() != 0.0 {
        let Some(temp) = box_from_rect(second) else {
            return false;
        };
        return polygon_to_polygon(first.polygon(), temp.polygon());
    }
    rect_to_rect(&first.bounds(), &second)
}

/// Detailed box collider vs rectangle.
#[must_use]
pub fn box_to_rect_ext(first: &BoxCollider, second: RectF) -> Option<CollisionResult> {
    if first.rotation() != 0.0 {
        let temp = box_from_rect(second)?;
        return polygon_to_polygon_ext(first.polygon(), temp.polygon());
    }
    rect_to_rect_ext(&first.bounds(), &second)
}

// A degenerate rect cannot form a box collider; treat it as non-colliding.
pub(crate) fn box_from_rect(rect: RectF) -> Option<BoxCollider> {
    let mut temp = BoxCollider::new(rect.w, rect.h).ok()?;
    temp.set_position(rect.location());
    Some(temp)
}

/// Rectangle overlap or containment in either direction.
#[must_use]
pub fn rect_to_rect(first: &RectF, second: &RectF) -> bool {
    first.contains_or_intersects(second)
}

fn minkowski_difference(first: &RectF, second: &RectF) -> RectF {
    RectF::new(
        first.x - second.right(),
        first.y - second.bottom(),
        first.w + second.w,
        first.h + second.h,
    )
}

/// Detailed rectangle overlap via the Minkowski difference: the rects
/// overlap when the difference rect contains the origin, and the MTV is
/// the closest point on its bounds to the origin. A zero MTV (edges
/// exactly touching) counts as no collision.
#[must_use]
pub fn rect_to_rect_ext(first: &RectF, second: &RectF) -> Option<CollisionResult> {
    let diff = minkowski_difference(first, second);
    if !diff.contains_point(Vec2::zeros()) {
        return None;
    }

    let minimum_translation_vector = diff.closest_point_on_bounds_to_origin();
    if minimum_translation_vector == Vec2::zeros() {
        return None;
    }

    Some(CollisionResult {
        normal: (-minimum_translation_vector).normalize(),
        minimum_translation_vector,
        point: Vec2::zeros(),
    })
}

// --- point ----------------------------------------------------------------

/// Point vs circle collider; the point acts as a unit-radius circle.
#[must_use]
pub fn point_to_circle(point: Vec2, circle: &CircleCollider) -> bool {
    radius_to_radius(point, POINT_RADIUS, circle.position(), circle.radius())
}

/// Detailed point vs circle collider.
#[must_use]
pub fn point_to_circle_ext(point: Vec2, circle: &CircleCollider) -> Option<CollisionResult> {
    radius_to_radius_ext(point, POINT_RADIUS, circle.position(), circle.radius())
}

/// Point vs raw circle.
#[must_use]
pub fn point_to_radius(point: Vec2, circle_position: Vec2, radius: f32) -> bool {
    radius_to_radius(point, POINT_RADIUS, circle_position, radius)
}

/// Detailed point vs raw circle.
#[must_use]
pub fn point_to_radius_ext(
    point: Vec2,
    circle_position: Vec2,
    radius: f32,
) -> Option<CollisionResult> {
    radius_to_radius_ext(point, POINT_RADIUS, circle_position, radius)
}

/// Point vs box, via containment for unrotated boxes.
#[must_use]
pub fn point_to_box(point: Vec2, second: &BoxCollider) -> bool {
    if second.rotation() != 0.0 {
        return point_to_poly(point, second.polygon());
    }
    point_to_rect(point, &second.bounds())
}

/// Detailed point vs box.
#[must_use]
pub fn point_to_box_ext(point: Vec2, second: &BoxCollider) -> Option<CollisionResult> {
    if second.rotation() != 0.0 {
        return point_to_poly_ext(point, second.polygon());
    }
    point_to_rect_ext(point, &second.bounds())
}

/// Edge-inclusive point-in-rect.
#[must_use]
pub fn point_to_rect(point: Vec2, rect: &RectF) -> bool {
    rect.contains_point(point)
}

/// Detailed point vs rect: contact on the nearest border, MTV from border
/// point to the point.
#[must_use]
pub fn point_to_rect_ext(point: Vec2, rect: &RectF) -> Option<CollisionResult> {
    if !rect.contains_point(point) {
        return None;
    }

    let (border_point, normal) = rect.closest_point_on_border_to(point);
    Some(CollisionResult {
        normal,
        minimum_translation_vector: point - border_point,
        point: border_point,
    })
}

/// Point vs polygon collider.
#[must_use]
pub fn point_to_poly(point: Vec2, poly: &PolygonCollider) -> bool {
    let shape_position = poly.position() - poly.center();
    let points = poly.world_points();
    point_to_shape(point, &points, shape_position)
}

/// Detailed point vs polygon collider.
#[must_use]
pub fn point_to_poly_ext(point: Vec2, poly: &PolygonCollider) -> Option<CollisionResult> {
    let shape_position = poly.position() - poly.center();
    let points = poly.world_points();
    point_to_shape_ext(point, &points, shape_position)
}

/// Point vs raw point slice at `shape_position`.
#[must_use]
pub fn point_to_shape(point: Vec2, points: &[Vec2], shape_position: Vec2) -> bool {
    point_in_shape(point - shape_position, points)
}

/// Detailed point vs raw point slice.
#[must_use]
pub fn point_to_shape_ext(
    point: Vec2,
    points: &[Vec2],
    shape_position: Vec2,
) -> Option<CollisionResult> {
    let local = point - shape_position;
    if !point_in_shape(local, points) {
        return None;
    }

    let (closest, dist_squared, normal) = closest_point_on_polygon_ext(points, local);
    Some(CollisionResult {
        normal,
        minimum_translation_vector: normal * dist_squared.sqrt(),
        point: closest + shape_position,
    })
}

// Crossing-number (ray casting) point-in-polygon over shape-space points.
// A ray shot from the point crossing an odd number of edges is inside.
fn point_in_shape(point: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        if (points[i].y > point.y) != (points[j].y > point.y)
            && point.x
                < (points[j].x - points[i].x) * (point.y - points[i].y)
                    / (points[j].y - points[i].y)
                    + points[i].x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point vs line collider.
#[must_use]
pub fn point_to_line(point: Vec2, line: &LineCollider) -> bool {
    point_to_segment(point, line.adjusted_start(), line.adjusted_end())
}

/// Detailed point vs line collider.
#[must_use]
pub fn point_to_line_ext(point: Vec2, line: &LineCollider) -> Option<CollisionResult> {
    point_to_segment_ext(point, line.adjusted_start(), line.adjusted_end())
}

/// Exact point-on-segment test: the distances from the point to both
/// endpoints must sum to exactly the segment length. Deliberately exact,
/// with no epsilon; callers wanting tolerance should test distance to
/// [`closest_point_on_segment`](crate::collision::utils::closest_point_on_segment).
#[must_use]
pub fn point_to_segment(point: Vec2, start: Vec2, end: Vec2) -> bool {
    let distances = distance(start, point) + distance(point, end);
    distances == distance(start, end)
}

/// Detailed point vs segment: the normalized segment perpendicular serves
/// as both normal and MTV.
#[must_use]
pub fn point_to_segment_ext(point: Vec2, start: Vec2, end: Vec2) -> Option<CollisionResult> {
    if !point_to_segment(point, start, end) {
        return None;
    }

    let perp = crate::math::perpendicular(start, end).normalize();
    Some(CollisionResult {
        normal: perp,
        minimum_translation_vector: perp,
        point,
    })
}

/// Exact point equality.
#[must_use]
pub fn point_to_point(first: Vec2, second: Vec2) -> bool {
    first == second
}

/// Detailed point vs point: coincident points use a fixed up-pointing
/// normal and unit MTV, since no direction is better than another.
#[must_use]
pub fn point_to_point_ext(first: Vec2, second: Vec2) -> Option<CollisionResult> {
    if first != second {
        return None;
    }

    Some(CollisionResult {
        normal: Vec2::new(0.0, -1.0),
        minimum_translation_vector: Vec2::new(0.0, -1.0),
        point: first,
    })
}

// --- segment / line -------------------------------------------------------

/// Line collider vs polygon edges.
#[must_use]
pub fn line_to_poly(line: &LineCollider, polygon: &PolygonCollider) -> bool {
    segment_to_poly(line.adjusted_start(), line.adjusted_end(), polygon)
}

/// Line collider cast against polygon edges.
#[must_use]
pub fn line_to_poly_ext(line: &LineCollider, polygon: &PolygonCollider) -> Option<RaycastHit> {
    segment_to_poly_ext(line.adjusted_start(), line.adjusted_end(), polygon)
}

/// Segment vs polygon edges.
#[must_use]
pub fn segment_to_poly(start: Vec2, end: Vec2, polygon: &PolygonCollider) -> bool {
    let shape_position = polygon.position() - polygon.center();
    let points = polygon.world_points();
    segment_to_shape(start, end, &points, shape_position)
}

/// Segment cast against polygon edges.
#[must_use]
pub fn segment_to_poly_ext(start: Vec2, end: Vec2, polygon: &PolygonCollider) -> Option<RaycastHit> {
    let shape_position = polygon.position() - polygon.center();
    let points = polygon.world_points();
    segment_to_shape_ext(start, end, &points, shape_position)
}

/// Segment vs raw point slice: true when the segment crosses any edge.
///
/// A segment entirely inside the shape crosses no edge and reports false;
/// pair with [`point_to_shape`] when containment matters.
#[must_use]
pub fn segment_to_shape(start: Vec2, end: Vec2, points: &[Vec2], shape_position: Vec2) -> bool {
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let edge_start = points[j] + shape_position;
        let edge_end = points[i] + shape_position;
        if segment_to_segment(start, end, edge_start, edge_end) {
            return true;
        }
        j = i;
    }
    false
}

/// Segment cast against every edge of a raw point slice, keeping the
/// crossing nearest the segment start.
///
/// The travel fraction is taken from the x-parameter and falls back to
/// the y-parameter for vertical segments. The hit normal is the winning
/// edge's perpendicular, which points outward for consistently wound
/// shapes.
#[must_use]
pub fn segment_to_shape_ext(
    start: Vec2,
    end: Vec2,
    points: &[Vec2],
    shape_position: Vec2,
) -> Option<RaycastHit> {
    let mut normal = Vec2::zeros();
    let mut intersection_point = Vec2::zeros();
    let mut fraction = f32::MAX;
    let mut intersects = false;

    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let edge_start = points[j] + shape_position;
        let edge_end = points[i] + shape_position;
        j = i;

        let Some(intersection) = segment_to_segment_intersection(start, end, edge_start, edge_end)
        else {
            continue;
        };
        intersects = true;

        let mut distance_fraction = (intersection.x - start.x) / (end.x - start.x);
        if distance_fraction.is_nan() {
            distance_fraction = (intersection.y - start.y) / (end.y - start.y);
        }

        if distance_fraction < fraction {
            let edge = edge_start - edge_end;
            normal = Vec2::new(edge.y, -edge.x);
            fraction = distance_fraction;
            intersection_point = intersection;
        }
    }

    if !intersects {
        return None;
    }

    Some(RaycastHit {
        fraction,
        distance: distance(start, intersection_point),
        point: intersection_point,
        normal: normal.normalize(),
    })
}

/// Line collider vs circle collider.
#[must_use]
pub fn line_to_circle(line: &LineCollider, circle: &CircleCollider) -> bool {
    segment_to_radius(
        line.adjusted_start(),
        line.adjusted_end(),
        circle.position(),
        circle.radius(),
    )
}

/// Line collider cast against a circle collider.
#[must_use]
pub fn line_to_circle_ext(line: &LineCollider, circle: &CircleCollider) -> Option<RaycastHit> {
    segment_to_radius_ext(
        line.adjusted_start(),
        line.adjusted_end(),
        circle.position(),
        circle.radius(),
    )
}

/// Segment vs circle collider.
#[must_use]
pub fn segment_to_circle(start: Vec2, end: Vec2, circle: &CircleCollider) -> bool {
    segment_to_radius(start, end, circle.position(), circle.radius())
}

/// Segment cast against a circle collider.
#[must_use]
pub fn segment_to_circle_ext(start: Vec2, end: Vec2, circle: &CircleCollider) -> Option<RaycastHit> {
    segment_to_radius_ext(start, end, circle.position(), circle.radius())
}

/// Line collider vs raw circle.
#[must_use]
pub fn line_to_radius(line: &LineCollider, position: Vec2, radius: f32) -> bool {
    segment_to_radius(line.adjusted_start(), line.adjusted_end(), position, radius)
}

/// Line collider cast against a raw circle.
#[must_use]
pub fn line_to_radius_ext(line: &LineCollider, position: Vec2, radius: f32) -> Option<RaycastHit> {
    segment_to_radius_ext(line.adjusted_start(), line.adjusted_end(), position, radius)
}

/// Analytic segment vs raw circle intersection test.
///
/// Solves the quadratic along the normalized segment direction, with a
/// quick reject when the segment starts outside and points away.
#[must_use]
pub fn segment_to_radius(start: Vec2, end: Vec2, position: Vec2, radius: f32) -> bool {
    let line_length = distance(start, end);
    let d = (end - start) / line_length;
    let m = start - position;
    let b = m.dot(&d);
    let c = m.dot(&m) - radius * radius;

    if c > 0.0 && b > 0.0 {
        return false;
    }

    b * b - c >= 0.0
}

/// Analytic segment cast against a raw circle.
///
/// A start point inside the circle clamps the impact to the segment
/// start (fraction 0).
#[must_use]
pub fn segment_to_radius_ext(
    start: Vec2,
    end: Vec2,
    position: Vec2,
    radius: f32,
) -> Option<RaycastHit> {
    let line_length = distance(start, end);
    let d = (end - start) / line_length;
    let m = start - position;
    let b = m.dot(&d);
    let c = m.dot(&m) - radius * radius;

    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()).max(0.0);
    let point = start + d * t;
    let dist = distance(start, point);

    Some(RaycastHit {
        fraction: dist / line_length,
        distance: dist,
        point,
        normal: (point - position).normalize(),
    })
}

/// Two line colliders intersect.
#[must_use]
pub fn line_to_line(first: &LineCollider, second: &LineCollider) -> bool {
    segment_to_segment(
        first.adjusted_start(),
        first.adjusted_end(),
        second.adjusted_start(),
        second.adjusted_end(),
    )
}

/// Detailed line/line intersection.
#[must_use]
pub fn line_to_line_ext(first: &LineCollider, second: &LineCollider) -> Option<CollisionResult> {
    segment_to_segment_ext(
        first.adjusted_start(),
        first.adjusted_end(),
        second.adjusted_start(),
        second.adjusted_end(),
    )
}

/// Line collider vs raw segment.
#[must_use]
pub fn line_to_segment(line: &LineCollider, start: Vec2, end: Vec2) -> bool {
    segment_to_segment(line.adjusted_start(), line.adjusted_end(), start, end)
}

/// Detailed line collider vs raw segment.
#[must_use]
pub fn line_to_segment_ext(line: &LineCollider, start: Vec2, end: Vec2) -> Option<CollisionResult> {
    segment_to_segment_ext(line.adjusted_start(), line.adjusted_end(), start, end)
}

/// Parametric segment/segment intersection.
///
/// Parallel segments never intersect, including the collinear-overlap
/// case; both parameters must land in [0, 1]. Returns the intersection
/// point.
#[must_use]
pub fn segment_to_segment_intersection(
    first_start: Vec2,
    first_end: Vec2,
    second_start: Vec2,
    second_end: Vec2,
) -> Option<Vec2> {
    let b = first_end - first_start;
    let d = second_end - second_start;
    let b_dot_d_perp = b.x * d.y - b.y * d.x;

    if b_dot_d_perp == 0.0 {
        return None;
    }

    let c = second_start - first_start;
    let t = (c.x * d.y - c.y * d.x) / b_dot_d_perp;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let u = (c.x * b.y - c.y * b.x) / b_dot_d_perp;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(first_start + b * t)
}

/// Boolean form of [`segment_to_segment_intersection`].
#[must_use]
pub fn segment_to_segment(
    first_start: Vec2,
    first_end: Vec2,
    second_start: Vec2,
    second_end: Vec2,
) -> bool {
    segment_to_segment_intersection(first_start, first_end, second_start, second_end).is_some()
}

/// Detailed segment/segment intersection.
///
/// The MTV is a heuristic: it runs from the intersection to the nearest
/// of the four endpoints (ties resolved in argument order), and the
/// normal is simply that vector normalized.
#[must_use]
pub fn segment_to_segment_ext(
    first_start: Vec2,
    first_end: Vec2,
    second_start: Vec2,
    second_end: Vec2,
) -> Option<CollisionResult> {
    let intersection =
        segment_to_segment_intersection(first_start, first_end, second_start, second_end)?;

    let mut min_vector = first_start;
    let mut min_distance = distance_squared(intersection, first_start);
    for candidate in [first_end, second_start, second_end] {
        let next_distance = distance_squared(intersection, candidate);
        if next_distance < min_distance {
            min_distance = next_distance;
            min_vector = candidate;
        }
    }

    let minimum_translation_vector = min_vector - intersection;
    Some(CollisionResult {
        normal: minimum_translation_vector.normalize(),
        minimum_translation_vector,
        point: intersection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::utils::build_box_points;
    use approx::assert_relative_eq;

    fn square(size: f32) -> Vec<Vec2> {
        build_box_points(size, size).to_vec()
    }

    fn square_normals() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ]
    }

    #[test]
    fn test_radius_to_radius_overlap_and_separation() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(15.0, 0.0);
        assert!(radius_to_radius(a, 10.0, b, 10.0));
        assert!(!radius_to_radius(a, 10.0, Vec2::new(20.0, 0.0), 10.0));
        // Touching circles do not overlap.
        assert!(!radius_to_radius(a, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_radius_to_radius_ext_depth_and_normal() {
        let result =
            radius_to_radius_ext(Vec2::new(0.0, 0.0), 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.minimum_translation_vector.x, 5.0, epsilon = 1e-5);
        // Contact point on the second circle's border.
        assert_relative_eq!(result.point.x, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_radius_to_radius_ext_argument_order_flips_normal() {
        let forward =
            radius_to_radius_ext(Vec2::new(0.0, 0.0), 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
        let reverse =
            radius_to_radius_ext(Vec2::new(15.0, 0.0), 10.0, Vec2::new(0.0, 0.0), 10.0).unwrap();
        assert_relative_eq!(forward.normal.x, -reverse.normal.x);
    }

    #[test]
    fn test_radius_to_rect_inside_and_outside() {
        let rect = RectF::new(0.0, 0.0, 100.0, 100.0);
        assert!(radius_to_rect(Vec2::new(50.0, 50.0), 5.0, &rect));
        assert!(radius_to_rect(Vec2::new(-3.0, 50.0), 5.0, &rect));
        assert!(!radius_to_rect(Vec2::new(-6.0, 50.0), 5.0, &rect));
    }

    #[test]
    fn test_radius_to_rect_ext_center_inside_pushes_to_border() {
        let rect = RectF::new(0.0, 0.0, 100.0, 100.0);
        let result = radius_to_rect_ext(Vec2::new(10.0, 50.0), 5.0, &rect).unwrap();
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.point.x, 0.0);
        // Pushing by -MTV lands the center one radius outside the border.
        assert_relative_eq!(result.minimum_translation_vector.x, 15.0);
    }

    #[test]
    fn test_radius_to_rect_ext_outside_depth() {
        let rect = RectF::new(0.0, 0.0, 100.0, 100.0);
        let result = radius_to_rect_ext(Vec2::new(-3.0, 50.0), 5.0, &rect).unwrap();
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.minimum_translation_vector.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_point_in_shape_crossing_number() {
        let points = square(10.0);
        assert!(point_to_shape(Vec2::new(5.0, 5.0), &points, Vec2::zeros()));
        assert!(!point_to_shape(Vec2::new(15.0, 5.0), &points, Vec2::zeros()));
        // Shape position translates the polygon.
        assert!(point_to_shape(
            Vec2::new(25.0, 5.0),
            &points,
            Vec2::new(20.0, 0.0)
        ));
    }

    #[test]
    fn test_radius_to_shape_center_outside_near_edge() {
        let points = square(10.0);
        assert!(radius_to_shape(
            Vec2::new(13.0, 5.0),
            5.0,
            &points,
            Vec2::zeros()
        ));
        assert!(!radius_to_shape(
            Vec2::new(16.0, 5.0),
            5.0,
            &points,
            Vec2::zeros()
        ));
    }

    #[test]
    fn test_shape_to_shape_separated_squares() {
        let points = square(10.0);
        let normals = square_normals();
        // Second square 20 units right of the first.
        assert!(!shape_to_shape(
            &points,
            &normals,
            Vec2::new(0.0, 0.0),
            &points,
            &normals,
            Vec2::new(20.0, 0.0)
        ));
        assert!(shape_to_shape(
            &points,
            &normals,
            Vec2::new(0.0, 0.0),
            &points,
            &normals,
            Vec2::new(5.0, 0.0)
        ));
    }

    #[test]
    fn test_shape_to_shape_ext_minimum_axis() {
        let points = square(10.0);
        let normals = square_normals();
        let result = shape_to_shape_ext(
            &points,
            &normals,
            Vec2::new(8.0, 0.0),
            &points,
            &normals,
            Vec2::new(0.0, 0.0),
        )
        .unwrap();
        // Two units of overlap along x, normal toward the first shape.
        assert_relative_eq!(result.normal.x, 1.0);
        assert_relative_eq!(result.minimum_translation_vector.x, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rect_to_rect_ext_minkowski_mtv() {
        let first = RectF::new(8.0, 0.0, 10.0, 10.0);
        let second = RectF::new(0.0, 0.0, 10.0, 10.0);
        let result = rect_to_rect_ext(&first, &second).unwrap();
        assert_relative_eq!(result.minimum_translation_vector.x, -2.0);
        assert_relative_eq!(result.normal.x, 1.0);
    }

    #[test]
    fn test_rect_to_rect_ext_touching_edges_is_none() {
        let first = RectF::new(10.0, 0.0, 10.0, 10.0);
        let second = RectF::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_to_rect_ext(&first, &second).is_none());
    }

    #[test]
    fn test_point_to_rect_ext_mtv_reaches_border() {
        let rect = RectF::new(0.0, 0.0, 10.0, 10.0);
        let result = point_to_rect_ext(Vec2::new(2.0, 5.0), &rect).unwrap();
        assert_relative_eq!(result.normal.x, -1.0);
        assert_relative_eq!(result.minimum_translation_vector.x, 2.0);
        assert!(point_to_rect_ext(Vec2::new(11.0, 5.0), &rect).is_none());
    }

    #[test]
    fn test_point_to_segment_on_and_off() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(10.0, 0.0);
        assert!(point_to_segment(Vec2::new(5.0, 0.0), start, end));
        assert!(!point_to_segment(Vec2::new(5.0, 0.1), start, end));
    }

    #[test]
    fn test_point_to_point_ext_fixed_normal() {
        let p = Vec2::new(3.0, 4.0);
        let result = point_to_point_ext(p, p).unwrap();
        assert_relative_eq!(result.normal.y, -1.0);
        assert!(point_to_point_ext(p, Vec2::new(3.0, 4.1)).is_none());
    }

    #[test]
    fn test_segment_to_segment_intersection_midpoint() {
        let intersection = segment_to_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
        )
        .unwrap();
        assert_relative_eq!(intersection.x, 5.0);
        assert_relative_eq!(intersection.y, 0.0);
    }

    #[test]
    fn test_segment_to_segment_parallel_is_none() {
        assert!(segment_to_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());
        // Collinear overlap counts as parallel.
        assert!(segment_to_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn test_segment_to_segment_out_of_range_parameters() {
        assert!(!segment_to_segment(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(15.0, -5.0),
            Vec2::new(15.0, 5.0),
        ));
    }

    #[test]
    fn test_segment_to_segment_ext_nearest_endpoint_mtv() {
        let result = segment_to_segment_ext(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(9.0, -5.0),
            Vec2::new(9.0, 5.0),
        )
        .unwrap();
        assert_relative_eq!(result.point.x, 9.0);
        // Nearest endpoint is the first segment's end at (10, 0).
        assert_relative_eq!(result.minimum_translation_vector.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_to_radius_hit_and_reject() {
        let start = Vec2::new(-10.0, 0.0);
        let end = Vec2::new(10.0, 0.0);
        assert!(segment_to_radius(start, end, Vec2::new(0.0, 3.0), 5.0));
        assert!(!segment_to_radius(start, end, Vec2::new(0.0, 6.0), 5.0));
        // Pointing away from the circle.
        assert!(!segment_to_radius(
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(0.0, 0.0),
            5.0
        ));
    }

    #[test]
    fn test_segment_to_radius_ext_entry_point() {
        let hit = segment_to_radius_ext(
            Vec2::new(-10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
            5.0,
        )
        .unwrap();
        assert_relative_eq!(hit.point.x, -5.0, epsilon = 1e-5);
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);
        assert_relative_eq!(hit.fraction, 0.25, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_to_radius_ext_start_inside_clamps_to_zero() {
        let hit = segment_to_radius_ext(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
            5.0,
        )
        .unwrap();
        assert_relative_eq!(hit.fraction, 0.0);
        assert_relative_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_segment_to_shape_ext_nearest_edge_wins() {
        let points = square(10.0);
        let hit = segment_to_shape_ext(
            Vec2::new(-5.0, 5.0),
            Vec2::new(15.0, 5.0),
            &points,
            Vec2::zeros(),
        )
        .unwrap();
        // Enters through the left edge.
        assert_relative_eq!(hit.point.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hit.fraction, 0.25, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.x.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_to_shape_vertical_segment_uses_y_fraction() {
        let points = square(10.0);
        let hit = segment_to_shape_ext(
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 15.0),
            &points,
            Vec2::zeros(),
        )
        .unwrap();
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hit.fraction, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_to_shape_contained_segment_misses() {
        let points = square(10.0);
        assert!(!segment_to_shape(
            Vec2::new(2.0, 5.0),
            Vec2::new(8.0, 5.0),
            &points,
            Vec2::zeros()
        ));
    }
}
