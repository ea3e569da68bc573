//! Narrow-phase scenarios through the `Collider` dispatch surface.

use approx::assert_relative_eq;
use std::f32::consts::FRAC_PI_4;

use super::init_logging;
use crate::collision::{self, ColliderContact};
use crate::colliders::{BoxCollider, Collider, ColliderShape};
use crate::math::Vec2;

fn positioned(mut collider: Collider, x: f32, y: f32) -> Collider {
    collider.set_position(Vec2::new(x, y));
    collider
}

#[test]
fn test_circle_pair_depth_and_resolution() {
    init_logging();
    let first = positioned(Collider::circle(10.0), 0.0, 0.0);
    let second = positioned(Collider::circle(10.0), 15.0, 0.0);

    let Some(ColliderContact::Overlap(result)) = first.collides_collider(&second) else {
        panic!("expected overlap contact");
    };

    // Radii sum 20, centers 15 apart: 5 units of penetration.
    assert_relative_eq!(result.minimum_translation_vector.norm(), 5.0, epsilon = 1e-5);

    // Subtracting the translation vector resolves the overlap exactly.
    let resolved = positioned(
        Collider::circle(10.0),
        -result.minimum_translation_vector.x,
        -result.minimum_translation_vector.y,
    );
    assert!(!resolved.overlaps_collider(&second));
}

#[test]
fn test_box_point_containment() {
    let b = positioned(Collider::new_box(32.0, 32.0).unwrap(), 0.0, 0.0);
    assert!(b.contains_point(Vec2::new(16.0, 16.0)));
    assert!(!b.contains_point(Vec2::new(33.0, 16.0)));
}

#[test]
fn test_axis_aligned_box_pair_resolution() {
    let first = positioned(Collider::new_box(10.0, 10.0).unwrap(), 0.0, 0.0);
    let second = positioned(Collider::new_box(10.0, 10.0).unwrap(), 8.0, 0.0);

    let Some(ColliderContact::Overlap(result)) = first.collides_collider(&second) else {
        panic!("expected overlap contact");
    };
    // Overlap band is x in (8, 10): push the first box 2 units left.
    assert_relative_eq!(result.minimum_translation_vector.x, 2.0, epsilon = 1e-5);
    assert_relative_eq!(result.minimum_translation_vector.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(result.normal.x, -1.0, epsilon = 1e-5);

    let resolved = positioned(
        Collider::new_box(10.0, 10.0).unwrap(),
        -result.minimum_translation_vector.x,
        -result.minimum_translation_vector.y,
    );
    assert!(!resolved.overlaps_collider(&second));
}

#[test]
fn test_rotated_boxes_separate_despite_overlapping_bounds() {
    // A 10x10 box pivoted on its middle and turned 45 degrees becomes a
    // diamond reaching out to x = y = 5 + 5 * sqrt(2) ~ 12.07.
    let mut inner = BoxCollider::new(10.0, 10.0).unwrap();
    inner.set_original_center(Vec2::new(5.0, 5.0));
    inner.set_rotation(FRAC_PI_4);
    inner.set_position(Vec2::new(5.0, 5.0));
    let diamond = Collider::new(ColliderShape::Box(inner));
    let square = positioned(Collider::new_box(10.0, 10.0).unwrap(), 11.0, 11.0);

    // The axis-aligned bounds still intersect near (11, 11); only the
    // separating-axis test can tell the corner gap apart.
    assert!(diamond.bounds().intersects(&square.bounds()));
    assert!(!diamond.overlaps_collider(&square));
    assert!(diamond.collides_collider(&square).is_none());
}

#[test]
fn test_crossing_segments_intersect_at_midpoint() {
    let intersection = collision::segment_to_segment_intersection(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(5.0, -5.0),
        Vec2::new(5.0, 5.0),
    )
    .expect("segments cross");
    assert_relative_eq!(intersection.x, 5.0, epsilon = 1e-5);
    assert_relative_eq!(intersection.y, 0.0, epsilon = 1e-5);

    // The same crossing through the collider surface, reported along the
    // queried segment.
    let line = Collider::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let hit = line
        .collides_line(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0))
        .expect("segments cross");
    assert_relative_eq!(hit.fraction, 0.5, epsilon = 1e-5);
    assert_relative_eq!(hit.point.x, 5.0, epsilon = 1e-5);
    assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
}

#[test]
fn test_segment_cast_against_circle_reports_entry_point() {
    let circle = positioned(Collider::circle(5.0), 0.0, 0.0);
    let hit = circle
        .collides_line(Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0))
        .expect("segment passes through the circle");

    assert_relative_eq!(hit.point.x, -5.0, epsilon = 1e-4);
    assert_relative_eq!(hit.distance, 15.0, epsilon = 1e-4);
    assert_relative_eq!(hit.fraction, 0.375, epsilon = 1e-5);
    assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-4);
}

#[test]
fn test_triangle_polygon_containment() {
    let triangle = Collider::polygon(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(0.0, 10.0),
    ])
    .unwrap();

    assert!(triangle.contains_point(Vec2::new(2.0, 2.0)));
    assert!(!triangle.contains_point(Vec2::new(8.0, 8.0)));
}

#[test]
fn test_circle_against_polygon_edge_overlap() {
    let triangle = Collider::polygon(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(20.0, 0.0),
        Vec2::new(0.0, 20.0),
    ])
    .unwrap();
    // Circle center 3 units outside the edge between (0, 0) and (20, 0),
    // overlapping it by 2.
    let circle = positioned(Collider::circle(5.0), 10.0, -3.0);

    let Some(ColliderContact::Overlap(result)) = circle.collides_collider(&triangle) else {
        panic!("expected overlap contact");
    };

    assert_relative_eq!(result.point.x, 10.0, epsilon = 1e-5);
    assert_relative_eq!(result.point.y, 0.0, epsilon = 1e-5);
    // Penetration depth is radius minus the center's edge distance.
    assert_relative_eq!(result.minimum_translation_vector.norm(), 2.0, epsilon = 1e-5);

    // Backing the circle out along the translation vector clears the edge.
    let resolved = positioned(
        Collider::circle(5.0),
        10.0 - 1.001 * result.minimum_translation_vector.x,
        -3.0 - 1.001 * result.minimum_translation_vector.y,
    );
    assert!(!resolved.overlaps_collider(&triangle));
}
