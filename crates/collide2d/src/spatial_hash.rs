//! Uniform-grid broad phase
//!
//! A [`SpatialHash`] maps integer grid cells to sets of [`ColliderId`]s.
//! Membership is maintained incrementally: a collider occupies every cell
//! its bounding box touches, and movement/rotation must go through the
//! hash (remove, mutate, re-add) so the buckets stay consistent with the
//! geometry. The hash never owns collider data; every query takes the
//! [`ColliderSet`] that does.
//!
//! Queries come in three families:
//!
//! - `broadphase_*` — the union of candidate ids from covered cells, no
//!   exact tests
//! - `collisions_*` — broadphase filtered through the exact narrow phase
//! - `first_*` / `collides_*` — short-circuit scans for "is anything
//!   there?"
//!
//! Bare query forms return a borrow of an internal scratch set that stays
//! valid until the next query; `_into` forms write into a caller buffer
//! instead.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::{
    colliders::{Collider, ColliderId, ColliderSet},
    error::ColliderError,
    math::{RectF, Vec2},
};

// Truncation-based floor, exact for |x| < 32768. World coordinates are
// expected to stay well inside that range after cell-size division.
#[allow(clippy::cast_possible_truncation)]
fn fast_floor(x: f32) -> i32 {
    (x + 32768.0) as i32 - 32768
}

/// Uniform-grid spatial hash over [`ColliderId`]s.
#[derive(Debug)]
pub struct SpatialHash {
    inverse_cell_size: f32,
    cells: HashMap<(i32, i32), HashSet<ColliderId>>,
    cache: HashSet<ColliderId>,
    secondary_cache: HashSet<ColliderId>,
}

impl SpatialHash {
    /// Creates a hash with square cells of the given edge length.
    ///
    /// # Errors
    ///
    /// Returns [`ColliderError::InvalidCellSize`] unless `cell_size` is
    /// strictly positive.
    pub fn new(cell_size: f32) -> Result<Self, ColliderError> {
        if cell_size <= 0.0 {
            return Err(ColliderError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            inverse_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            cache: HashSet::new(),
            secondary_cache: HashSet::new(),
        })
    }

    /// Edge length of a cell.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        1.0 / self.inverse_cell_size
    }

    fn cell_point(&self, v: Vec2) -> (i32, i32) {
        (
            fast_floor(v.x * self.inverse_cell_size),
            fast_floor(v.y * self.inverse_cell_size),
        )
    }

    // Half-open cell range covered by a rect: [floor(left), floor(right) + 1)
    // by [floor(top), floor(bottom) + 1). Rects flush with a cell edge still
    // occupy the next cell over.
    fn cell_range(&self, rect: &RectF) -> (i32, i32, i32, i32) {
        (
            fast_floor(rect.left() * self.inverse_cell_size),
            fast_floor(rect.top() * self.inverse_cell_size),
            fast_floor(rect.right() * self.inverse_cell_size) + 1,
            fast_floor(rect.bottom() * self.inverse_cell_size) + 1,
        )
    }

    /// Inserts a collider into every cell its bounds cover.
    pub fn add(&mut self, set: &ColliderSet, id: ColliderId) {
        let Some(collider) = set.get(id) else {
            return;
        };
        let (min_x, min_y, max_x, max_y) = self.cell_range(&collider.bounds());
        trace!("add {id:?} to cells [{min_x}, {max_x}) x [{min_y}, {max_y})");

        for x in min_x..max_x {
            for y in min_y..max_y {
                self.cells.entry((x, y)).or_default().insert(id);
            }
        }
    }

    /// Removes a collider from every cell its *current* bounds cover.
    ///
    /// The bounds must not have changed since the matching [`add`](Self::add);
    /// use [`remove_with_brute_force`](Self::remove_with_brute_force) when
    /// they have.
    pub fn remove(&mut self, set: &ColliderSet, id: ColliderId) {
        let Some(collider) = set.get(id) else {
            return;
        };
        let (min_x, min_y, max_x, max_y) = self.cell_range(&collider.bounds());
        trace!("remove {id:?} from cells [{min_x}, {max_x}) x [{min_y}, {max_y})");

        for x in min_x..max_x {
            for y in min_y..max_y {
                if let Some(cell) = self.cells.get_mut(&(x, y)) {
                    cell.remove(&id);
                }
            }
        }
    }

    /// Removes a collider by scanning every cell. The fallback for ids
    /// whose bounds changed outside the hash's control.
    pub fn remove_with_brute_force(&mut self, id: ColliderId) {
        debug!("brute-force removal of {id:?}");
        for cell in self.cells.values_mut() {
            cell.remove(&id);
        }
    }

    /// Drops all cell memberships. Collider data in the set is untouched.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Translates a collider by `delta`, re-bucketing it.
    pub fn move_by(&mut self, set: &mut ColliderSet, id: ColliderId, delta: Vec2) {
        self.remove(set, id);
        if let Some(collider) = set.get_mut(id) {
            let position = collider.position() + delta;
            collider.set_position(position);
        }
        self.add(set, id);
    }

    /// Moves a collider to `position`, re-bucketing it.
    pub fn set_position(&mut self, set: &mut ColliderSet, id: ColliderId, position: Vec2) {
        self.remove(set, id);
        if let Some(collider) = set.get_mut(id) {
            collider.set_position(position);
        }
        self.add(set, id);
    }

    /// Rotates a collider by `delta` radians, re-bucketing it.
    pub fn rotate_by(&mut self, set: &mut ColliderSet, id: ColliderId, delta: f32) {
        self.remove(set, id);
        if let Some(collider) = set.get_mut(id) {
            let rotation = collider.rotation() + delta;
            collider.set_rotation(rotation);
        }
        self.add(set, id);
    }

    /// Sets a collider's rotation, re-bucketing it.
    pub fn set_rotation(&mut self, set: &mut ColliderSet, id: ColliderId, rotation: f32) {
        self.remove(set, id);
        if let Some(collider) = set.get_mut(id) {
            collider.set_rotation(rotation);
        }
        self.add(set, id);
    }

    /// Every id present in any cell.
    pub fn all(&mut self) -> &HashSet<ColliderId> {
        self.cache.clear();
        for cell in self.cells.values() {
            self.cache.extend(cell);
        }
        &self.cache
    }

    /// Every id whose collider passes `predicate`.
    pub fn all_where(
        &mut self,
        set: &ColliderSet,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> &HashSet<ColliderId> {
        self.cache.clear();
        for cell in self.cells.values() {
            for &id in cell {
                if set.get(id).is_some_and(|c| predicate(id, c)) {
                    self.cache.insert(id);
                }
            }
        }
        &self.cache
    }

    // --- broadphase: cell unions, no exact tests ---

    /// Candidate ids from the cell containing `position`.
    pub fn broadphase_point(&mut self, position: Vec2) -> &HashSet<ColliderId> {
        self.broadphase_rect(RectF::new(position.x, position.y, 0.0, 0.0))
    }

    /// [`broadphase_point`](Self::broadphase_point) into a caller buffer.
    pub fn broadphase_point_into(&self, position: Vec2, results: &mut HashSet<ColliderId>) {
        self.broadphase_rect_into(RectF::new(position.x, position.y, 0.0, 0.0), results);
    }

    /// Candidate ids from every cell covered by `rect`.
    pub fn broadphase_rect(&mut self, rect: RectF) -> &HashSet<ColliderId> {
        let mut cache = std::mem::take(&mut self.cache);
        cache.clear();
        self.broadphase_rect_into(rect, &mut cache);
        self.cache = cache;
        &self.cache
    }

    /// [`broadphase_rect`](Self::broadphase_rect) into a caller buffer.
    pub fn broadphase_rect_into(&self, rect: RectF, results: &mut HashSet<ColliderId>) {
        let (min_x, min_y, max_x, max_y) = self.cell_range(&rect);
        for x in min_x..max_x {
            for y in min_y..max_y {
                if let Some(cell) = self.cells.get(&(x, y)) {
                    results.extend(cell);
                }
            }
        }
    }

    /// Candidate ids from every cell covered by a collider's bounds. The
    /// collider's own id is included.
    pub fn broadphase_collider(&mut self, set: &ColliderSet, id: ColliderId) -> &HashSet<ColliderId> {
        let mut cache = std::mem::take(&mut self.cache);
        cache.clear();
        self.broadphase_collider_into(set, id, &mut cache);
        self.cache = cache;
        &self.cache
    }

    /// [`broadphase_collider`](Self::broadphase_collider) into a caller
    /// buffer.
    pub fn broadphase_collider_into(
        &self,
        set: &ColliderSet,
        id: ColliderId,
        results: &mut HashSet<ColliderId>,
    ) {
        if let Some(collider) = set.get(id) {
            self.broadphase_rect_into(collider.bounds(), results);
        }
    }

    // --- collides: boolean short circuits ---

    /// True when any collider contains `position`.
    #[must_use]
    pub fn collides_point(&self, set: &ColliderSet, position: Vec2) -> bool {
        self.first_point(set, position).is_some()
    }

    /// [`collides_point`](Self::collides_point) with an extra predicate.
    #[must_use]
    pub fn collides_point_where(
        &self,
        set: &ColliderSet,
        position: Vec2,
        predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> bool {
        self.first_point_where(set, position, predicate).is_some()
    }

    /// True when any collider overlaps `bounds`.
    #[must_use]
    pub fn collides_rect(&self, set: &ColliderSet, bounds: RectF) -> bool {
        self.first_rect(set, bounds).is_some()
    }

    /// [`collides_rect`](Self::collides_rect) with an extra predicate.
    #[must_use]
    pub fn collides_rect_where(
        &self,
        set: &ColliderSet,
        bounds: RectF,
        predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> bool {
        self.first_rect_where(set, bounds, predicate).is_some()
    }

    /// True when any *other* collider overlaps the one behind `id`.
    #[must_use]
    pub fn collides_collider(&self, set: &ColliderSet, id: ColliderId) -> bool {
        self.first_collider(set, id).is_some()
    }

    /// [`collides_collider`](Self::collides_collider) with an extra
    /// predicate.
    #[must_use]
    pub fn collides_collider_where(
        &self,
        set: &ColliderSet,
        id: ColliderId,
        predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> bool {
        self.first_collider_where(set, id, predicate).is_some()
    }

    // --- collisions: broadphase + exact narrow phase ---

    /// Ids of colliders containing `position`.
    pub fn collisions_point(&mut self, set: &ColliderSet, position: Vec2) -> &HashSet<ColliderId> {
        self.collisions_point_where(set, position, |_, _| true)
    }

    /// [`collisions_point`](Self::collisions_point) with an extra
    /// predicate.
    pub fn collisions_point_where(
        &mut self,
        set: &ColliderSet,
        position: Vec2,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> &HashSet<ColliderId> {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_point_into(position, &mut secondary);

        self.cache.clear();
        for &id in &secondary {
            if let Some(collider) = set.get(id) {
                if collider.contains_point(position) && predicate(id, collider) {
                    self.cache.insert(id);
                }
            }
        }

        self.secondary_cache = secondary;
        &self.cache
    }

    /// [`collisions_point`](Self::collisions_point) into a caller buffer.
    pub fn collisions_point_into(
        &mut self,
        set: &ColliderSet,
        position: Vec2,
        results: &mut HashSet<ColliderId>,
    ) {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_point_into(position, &mut secondary);

        for &id in &secondary {
            if set.get(id).is_some_and(|c| c.contains_point(position)) {
                results.insert(id);
            }
        }

        self.secondary_cache = secondary;
    }

    /// Ids of colliders overlapping `bounds`.
    pub fn collisions_rect(&mut self, set: &ColliderSet, bounds: RectF) -> &HashSet<ColliderId> {
        self.collisions_rect_where(set, bounds, |_, _| true)
    }

    /// [`collisions_rect`](Self::collisions_rect) with an extra predicate.
    pub fn collisions_rect_where(
        &mut self,
        set: &ColliderSet,
        bounds: RectF,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> &HashSet<ColliderId> {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_rect_into(bounds, &mut secondary);

        self.cache.clear();
        for &id in &secondary {
            if let Some(collider) = set.get(id) {
                if collider.overlaps_rect(bounds) && predicate(id, collider) {
                    self.cache.insert(id);
                }
            }
        }

        self.secondary_cache = secondary;
        &self.cache
    }

    /// [`collisions_rect`](Self::collisions_rect) into a caller buffer.
    pub fn collisions_rect_into(
        &mut self,
        set: &ColliderSet,
        bounds: RectF,
        results: &mut HashSet<ColliderId>,
    ) {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_rect_into(bounds, &mut secondary);

        for &id in &secondary {
            if set.get(id).is_some_and(|c| c.overlaps_rect(bounds)) {
                results.insert(id);
            }
        }

        self.secondary_cache = secondary;
    }

    /// Ids of colliders overlapping the one behind `id`, excluding `id`
    /// itself.
    pub fn collisions_collider(
        &mut self,
        set: &ColliderSet,
        id: ColliderId,
    ) -> &HashSet<ColliderId> {
        self.collisions_collider_where(set, id, |_, _| true)
    }

    /// [`collisions_collider`](Self::collisions_collider) with an extra
    /// predicate.
    pub fn collisions_collider_where(
        &mut self,
        set: &ColliderSet,
        id: ColliderId,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> &HashSet<ColliderId> {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_collider_into(set, id, &mut secondary);

        self.cache.clear();
        if let Some(collider) = set.get(id) {
            for &other_id in &secondary {
                if other_id == id {
                    continue;
                }
                if let Some(other) = set.get(other_id) {
                    if collider.overlaps_collider(other) && predicate(other_id, other) {
                        self.cache.insert(other_id);
                    }
                }
            }
        }

        self.secondary_cache = secondary;
        &self.cache
    }

    /// [`collisions_collider`](Self::collisions_collider) into a caller
    /// buffer.
    pub fn collisions_collider_into(
        &mut self,
        set: &ColliderSet,
        id: ColliderId,
        results: &mut HashSet<ColliderId>,
    ) {
        let mut secondary = std::mem::take(&mut self.secondary_cache);
        secondary.clear();
        self.broadphase_collider_into(set, id, &mut secondary);

        if let Some(collider) = set.get(id) {
            for &other_id in &secondary {
                if other_id == id {
                    continue;
                }
                if set
                    .get(other_id)
                    .is_some_and(|other| collider.overlaps_collider(other))
                {
                    results.insert(other_id);
                }
            }
        }

        self.secondary_cache = secondary;
    }

    // --- first: short-circuit scans ---

    /// First collider found containing `position`. Only the single cell
    /// containing the point is inspected, which is what makes this
    /// cheaper than filtering `collisions_point`.
    #[must_use]
    pub fn first_point(&self, set: &ColliderSet, position: Vec2) -> Option<ColliderId> {
        self.first_point_where(set, position, |_, _| true)
    }

    /// [`first_point`](Self::first_point) with an extra predicate.
    #[must_use]
    pub fn first_point_where(
        &self,
        set: &ColliderSet,
        position: Vec2,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> Option<ColliderId> {
        let cell = self.cells.get(&self.cell_point(position))?;
        for &id in cell {
            if let Some(collider) = set.get(id) {
                if collider.contains_point(position) && predicate(id, collider) {
                    return Some(id);
                }
            }
        }
        None
    }

    /// First collider found overlapping `bounds`.
    #[must_use]
    pub fn first_rect(&self, set: &ColliderSet, bounds: RectF) -> Option<ColliderId> {
        self.first_rect_where(set, bounds, |_, _| true)
    }

    /// [`first_rect`](Self::first_rect) with an extra predicate.
    #[must_use]
    pub fn first_rect_where(
        &self,
        set: &ColliderSet,
        bounds: RectF,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> Option<ColliderId> {
        let (min_x, min_y, max_x, max_y) = self.cell_range(&bounds);
        for x in min_x..max_x {
            for y in min_y..max_y {
                let Some(cell) = self.cells.get(&(x, y)) else {
                    continue;
                };
                for &id in cell {
                    if let Some(collider) = set.get(id) {
                        if collider.overlaps_rect(bounds) && predicate(id, collider) {
                            return Some(id);
                        }
                    }
                }
            }
        }
        None
    }

    /// First *other* collider found overlapping the one behind `id`.
    #[must_use]
    pub fn first_collider(&self, set: &ColliderSet, id: ColliderId) -> Option<ColliderId> {
        self.first_collider_where(set, id, |_, _| true)
    }

    /// [`first_collider`](Self::first_collider) with an extra predicate.
    #[must_use]
    pub fn first_collider_where(
        &self,
        set: &ColliderSet,
        id: ColliderId,
        mut predicate: impl FnMut(ColliderId, &Collider) -> bool,
    ) -> Option<ColliderId> {
        let collider = set.get(id)?;
        let (min_x, min_y, max_x, max_y) = self.cell_range(&collider.bounds());
        for x in min_x..max_x {
            for y in min_y..max_y {
                let Some(cell) = self.cells.get(&(x, y)) else {
                    continue;
                };
                for &other_id in cell {
                    if other_id == id {
                        continue;
                    }
                    if let Some(other) = set.get(other_id) {
                        if collider.overlaps_collider(other) && predicate(other_id, other) {
                            return Some(other_id);
                        }
                    }
                }
            }
        }
        None
    }
}
