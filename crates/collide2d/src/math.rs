//! Geometry primitives shared by the collider and collision modules

/// 2D vector used throughout the crate
pub type Vec2 = nalgebra::Vector2<f32>;

/// Perpendicular of the edge running from `start` to `end`.
///
/// Returns `(-(end.y - start.y), end.x - start.x)`, i.e. the edge direction
/// rotated 90 degrees counter-clockwise. Not normalized.
#[must_use]
pub fn perpendicular(start: Vec2, end: Vec2) -> Vec2 {
    Vec2::new(-(end.y - start.y), end.x - start.x)
}

/// Rotates `v` by `radians` around the origin.
#[must_use]
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Component-wise minimum of two vectors.
#[must_use]
pub fn component_min(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x.min(b.x), a.y.min(b.y))
}

/// Component-wise maximum of two vectors.
#[must_use]
pub fn component_max(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x.max(b.x), a.y.max(b.y))
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).norm()
}

/// Squared Euclidean distance between two points.
#[must_use]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    (a - b).norm_squared()
}

/// First-minimal-wins minimum over a slice.
///
/// Returns 0.0 for an empty slice. Uses strict `<` so that when several
/// entries tie for the minimum, the earliest one wins. Callers that branch
/// on which entry won (e.g. border-normal selection) rely on this ordering.
#[must_use]
pub fn min_of(values: &[f32]) -> f32 {
    let mut min = match values.first() {
        Some(&v) => v,
        None => return 0.0,
    };
    for &v in &values[1..] {
        if v < min {
            min = v;
        }
    }
    min
}

/// Axis-aligned rectangle with float coordinates.
///
/// `(x, y)` is the top-left corner; `w` and `h` extend right and down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl RectF {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge x-coordinate.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge y-coordinate.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge x-coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge y-coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Top-left corner.
    #[must_use]
    pub const fn location(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// True when the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Edge-inclusive point containment.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Strict edge-exclusive overlap test.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap or full containment in either direction.
    #[must_use]
    pub fn contains_or_intersects(&self, other: &Self) -> bool {
        self.intersects(other) || self.contains_rect(other) || other.contains_rect(self)
    }

    /// Clamps `point` into the rectangle.
    #[must_use]
    pub fn closest_point_to(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.x, self.right()),
            point.y.clamp(self.y, self.bottom()),
        )
    }

    /// Closest point on the rectangle border together with the outward
    /// normal of the border edge it lies on.
    ///
    /// Interior points are pushed to the nearest edge; ties are broken in
    /// the fixed order left, right, top, bottom.
    #[must_use]
    pub fn closest_point_on_border_to(&self, point: Vec2) -> (Vec2, Vec2) {
        let mut result = self.closest_point_to(point);

        let deltas = [
            result.x - self.x,
            self.right() - result.x,
            result.y - self.y,
            self.bottom() - result.y,
        ];
        let min = min_of(&deltas);

        let normal;
        if min == deltas[0] {
            result.x = self.x;
            normal = Vec2::new(-1.0, 0.0);
        } else if min == deltas[1] {
            result.x = self.right();
            normal = Vec2::new(1.0, 0.0);
        } else if min == deltas[2] {
            result.y = self.y;
            normal = Vec2::new(0.0, -1.0);
        } else {
            result.y = self.bottom();
            normal = Vec2::new(0.0, 1.0);
        }

        (result, normal)
    }

    /// Point on the rectangle bounds closest to the origin.
    ///
    /// Only meaningful for rectangles that contain the origin (the
    /// Minkowski-difference test). Ties go to the earliest of left, right,
    /// bottom, top.
    #[must_use]
    pub fn closest_point_on_bounds_to_origin(&self) -> Vec2 {
        let max_x = self.right();
        let max_y = self.bottom();

        let mut min_dist = self.x.abs();
        let mut bounds_point = Vec2::new(self.x, 0.0);

        if max_x.abs() < min_dist {
            min_dist = max_x.abs();
            bounds_point = Vec2::new(max_x, 0.0);
        }
        if max_y.abs() < min_dist {
            min_dist = max_y.abs();
            bounds_point = Vec2::new(0.0, max_y);
        }
        if self.y.abs() < min_dist {
            bounds_point = Vec2::new(0.0, self.y);
        }

        bounds_point
    }
}
