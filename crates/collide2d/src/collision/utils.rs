//! Shape-agnostic helpers shared by the narrow-phase routines

use crate::math::{distance_squared, perpendicular, Vec2};

/// Corner points of a `width` x `height` box with its top-left at the
/// origin, in consistent winding order.
#[must_use]
pub fn build_box_points(width: f32, height: f32) -> [Vec2; 4] {
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ]
}

/// Arithmetic mean of the polygon's vertices.
#[must_use]
pub fn polygon_find_center(points: &[Vec2]) -> Vec2 {
    let mut sum = Vec2::zeros();
    for p in points {
        sum += p;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f32;
    sum / count
}

/// Vertex with the greatest projection along `direction`.
#[must_use]
pub fn farthest_point_in_direction(points: &[Vec2], direction: Vec2) -> Vec2 {
    let mut best = points[0];
    let mut best_dot = best.dot(&direction);
    for p in &points[1..] {
        let dot = p.dot(&direction);
        if dot > best_dot {
            best_dot = dot;
            best = *p;
        }
    }
    best
}

/// Closest point to `point` on the segment from `start` to `end`.
#[must_use]
pub fn closest_point_on_segment(start: Vec2, end: Vec2, point: Vec2) -> Vec2 {
    let edge = end - start;
    let length_squared = edge.norm_squared();
    if length_squared == 0.0 {
        return start;
    }
    let t = ((point - start).dot(&edge) / length_squared).clamp(0.0, 1.0);
    start + edge * t
}

/// Closest point to `point` over all edges of the polygon, with the
/// squared distance to it.
#[must_use]
pub fn closest_point_on_polygon(points: &[Vec2], point: Vec2) -> (Vec2, f32) {
    let (closest, dist_squared, _) = closest_point_on_polygon_ext(points, point);
    (closest, dist_squared)
}

/// Like [`closest_point_on_polygon`], additionally returning the
/// normalized outward normal of the winning edge.
#[must_use]
pub fn closest_point_on_polygon_ext(points: &[Vec2], point: Vec2) -> (Vec2, f32, Vec2) {
    let mut closest = Vec2::zeros();
    let mut min_dist_squared = f32::MAX;
    let mut edge_normal = Vec2::zeros();

    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let candidate = closest_point_on_segment(points[i], points[j], point);
        let dist_squared = distance_squared(point, candidate);
        if dist_squared < min_dist_squared {
            min_dist_squared = dist_squared;
            closest = candidate;
            edge_normal = perpendicular(points[i], points[j]).normalize();
        }
    }

    (closest, min_dist_squared, edge_normal)
}
