pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod transform;

pub use transform::Transform;

use std::f64::consts::TAU;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous transformation matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default distance below which two vertices are considered the same.
pub const MERGE_TOLERANCE: f64 = 1e-6;

/// Two departure angles closer than this are considered the same direction.
pub const ANGLE_TOLERANCE: f64 = 1e-7;

/// Returns `true` if the two points lie within `tol` of each other.
#[must_use]
pub fn coincident(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a - b).norm_squared() <= tol * tol
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Returns the smallest absolute difference between two angles, in `[0, π]`.
#[must_use]
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    d.min(TAU - d)
}

/// Returns the polar angle of `v` normalized into `[0, 2π)`.
#[must_use]
pub fn polar_angle(v: &Vector2) -> f64 {
    normalize_angle(v.y.atan2(v.x))
}

/// Returns the point at polar angle `angle` and distance `radius` from `center`.
#[must_use]
pub fn polar_point(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Aabb {
    /// Creates a degenerate box containing a single point.
    #[must_use]
    pub fn from_point(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// Returns the smallest box containing all `points`, or `None` if empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(*first);
        for p in iter {
            aabb.include(p);
        }
        Some(aabb)
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grows the box to contain `other`.
    pub fn union(&mut self, other: &Aabb) {
        self.include(&other.min);
        self.include(&other.max);
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns `true` if `p` is inside the box, expanded by `tol`.
    #[must_use]
    pub fn contains(&self, p: &Point2, tol: f64) -> bool {
        p.x >= self.min.x - tol
            && p.x <= self.max.x + tol
            && p.y >= self.min.y - tol
            && p.y <= self.max.y + tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn normalize_wraps_negative_angles() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < TOLERANCE);
        assert!(normalize_angle(TAU).abs() < TOLERANCE);
        assert!(normalize_angle(-1e-18) < TAU);
    }

    #[test]
    fn angle_distance_is_symmetric_across_zero() {
        assert!((angle_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
        assert!((angle_distance(TAU - 0.1, 0.1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn coincident_uses_tolerance() {
        let a = Point2::new(1.0, 1.0);
        assert!(coincident(&a, &Point2::new(1.0 + 1e-9, 1.0), 1e-6));
        assert!(!coincident(&a, &Point2::new(2.0, 1.0), 1e-6));
    }

    #[test]
    fn aabb_grows_to_fit_points() {
        let pts = [Point2::new(1.0, -2.0), Point2::new(-3.0, 4.0)];
        let aabb = Aabb::from_points(&pts).unwrap_or(Aabb::from_point(Point2::origin()));
        assert!((aabb.width() - 4.0).abs() < TOLERANCE);
        assert!((aabb.height() - 6.0).abs() < TOLERANCE);
        assert!(aabb.contains(&Point2::origin(), 0.0));
    }
}
