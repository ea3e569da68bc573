//! Broad-phase scenarios driving the hash and the collider set together.

use std::collections::HashSet;

use super::init_logging;
use crate::colliders::{Collider, ColliderId, ColliderSet};
use crate::math::{RectF, Vec2};
use crate::spatial_hash::SpatialHash;

struct World {
    set: ColliderSet,
    hash: SpatialHash,
}

impl World {
    fn new(cell_size: f32) -> Self {
        init_logging();
        Self {
            set: ColliderSet::new(),
            hash: SpatialHash::new(cell_size).unwrap(),
        }
    }

    fn spawn(&mut self, mut collider: Collider, x: f32, y: f32) -> ColliderId {
        collider.set_position(Vec2::new(x, y));
        let id = self.set.insert(collider);
        self.hash.add(&self.set, id);
        id
    }
}

#[test]
fn test_point_queries_find_the_right_collider() {
    let mut world = World::new(64.0);
    let near = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 40.0, 64.0);
    let far = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 400.0, 400.0);

    let hits = world.hash.collisions_point(&world.set, Vec2::new(45.0, 70.0));
    assert!(hits.contains(&near));
    assert!(!hits.contains(&far));

    assert!(world.hash.collisions_point(&world.set, Vec2::new(200.0, 200.0)).is_empty());
    assert!(world.hash.collides_point(&world.set, Vec2::new(45.0, 70.0)));
    assert!(!world.hash.collides_point(&world.set, Vec2::new(200.0, 200.0)));
}

#[test]
fn test_overlapping_mixed_shapes_discover_each_other() {
    let mut world = World::new(64.0);
    let circle = world.spawn(Collider::circle(16.0), 100.0, 100.0);
    let square = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 116.0, 100.0);
    let bystander = world.spawn(Collider::circle(8.0), 300.0, 300.0);

    assert_eq!(world.hash.first_collider(&world.set, circle), Some(square));
    assert_eq!(world.hash.first_collider(&world.set, square), Some(circle));
    assert_eq!(world.hash.first_collider(&world.set, bystander), None);
}

#[test]
fn test_move_by_vacates_old_cells() {
    let mut world = World::new(64.0);
    let id = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 0.0, 0.0);

    let World { set, hash } = &mut world;
    hash.move_by(set, id, Vec2::new(300.0, 0.0));

    // Old cells hold no candidates at all, not just no exact hits.
    assert!(hash.broadphase_point(Vec2::new(0.0, 0.0)).is_empty());
    let hits = hash.collisions_point(set, Vec2::new(300.0, 0.0));
    assert!(hits.contains(&id));
}

#[test]
fn test_rotation_rebuckets_a_long_collider() {
    let mut world = World::new(64.0);
    // A 300x4 bar out of the origin occupies cells along the x axis until
    // a quarter turn about its corner swings it down the y axis.
    let id = world.spawn(Collider::new_box(300.0, 4.0).unwrap(), 0.0, 0.0);

    let probe = Vec2::new(-2.0, 130.0);
    assert_eq!(world.hash.first_point(&world.set, probe), None);

    let World { set, hash } = &mut world;
    hash.set_rotation(set, id, std::f32::consts::FRAC_PI_2);
    assert_eq!(hash.first_point(set, probe), Some(id));
}

#[test]
fn test_removed_collider_never_comes_back() {
    let mut world = World::new(64.0);
    let id = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 40.0, 64.0);

    world.hash.remove(&world.set, id);
    world.set.remove(id);

    assert!(world.hash.all().is_empty());
    assert!(!world.hash.collides_point(&world.set, Vec2::new(45.0, 70.0)));
    assert!(world.hash.collisions_rect(&world.set, RectF::new(0.0, 0.0, 200.0, 200.0)).is_empty());
}

#[test]
fn test_where_queries_filter_by_tag() {
    let mut world = World::new(64.0);
    let friendly = world.spawn(Collider::circle(16.0), 0.0, 0.0);
    let hostile = world.spawn(Collider::circle(16.0), 10.0, 0.0);
    world.set.get_mut(hostile).unwrap().set_tag(1);

    let query = RectF::new(-8.0, -8.0, 16.0, 16.0);
    let everyone = world.hash.collisions_rect(&world.set, query).clone();
    assert!(everyone.contains(&friendly) && everyone.contains(&hostile));

    let hostiles_only = world
        .hash
        .collisions_rect_where(&world.set, query, |_, c| c.tag() == 1);
    assert!(hostiles_only.contains(&hostile));
    assert!(!hostiles_only.contains(&friendly));

    assert!(world
        .hash
        .collides_collider_where(&world.set, friendly, |_, c| c.tag() == 1));
    assert!(!world
        .hash
        .collides_collider_where(&world.set, friendly, |_, c| c.tag() == 2));
}

#[test]
fn test_into_variants_fill_caller_buffers() {
    let mut world = World::new(64.0);
    let a = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 0.0, 0.0);
    let b = world.spawn(Collider::new_box(32.0, 32.0).unwrap(), 16.0, 0.0);

    let mut candidates = HashSet::new();
    world
        .hash
        .broadphase_rect_into(RectF::new(-8.0, -8.0, 16.0, 16.0), &mut candidates);
    assert!(candidates.contains(&a) && candidates.contains(&b));

    let mut hits = HashSet::new();
    world
        .hash
        .collisions_collider_into(&world.set, a, &mut hits);
    assert_eq!(hits.len(), 1);
    assert!(hits.contains(&b));
}
