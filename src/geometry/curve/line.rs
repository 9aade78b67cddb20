use crate::error::{GeometryError, Result};
use crate::math::distance_2d::project_on_segment;
use crate::math::intersect_2d::{line_circle_intersect_2d, line_line_intersect_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Circle, Curve, CurveDomain};

/// An infinite line defined by an origin point and a unit direction.
///
/// The parametric form is: `P(t) = origin + t * direction`, so `t` is the
/// signed distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point2,
    direction: Vector2,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates the line through `a` towards `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: Point2, b: &Point2) -> Result<Self> {
        Self::new(a, b - a)
    }

    /// Creates the line leaving `origin` at polar angle `angle`.
    #[must_use]
    pub fn from_angle(origin: Point2, angle: f64) -> Self {
        Self {
            origin,
            direction: Vector2::new(angle.cos(), angle.sin()),
        }
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Returns the point at signed distance `t` from the origin.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Returns the parameter of the orthogonal projection of `p`.
    #[must_use]
    pub fn param_of(&self, p: &Point2) -> f64 {
        project_on_segment(p, &self.origin, &(self.origin + self.direction))
    }

    /// Returns the perpendicular distance from `p` to the line.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        self.direction.perp(&(p - self.origin)).abs()
    }

    /// Intersects two lines, returning the parameters on `self` and `other`.
    #[must_use]
    pub fn intersect_line(&self, other: &Line) -> Option<(f64, f64)> {
        line_line_intersect_2d(&self.origin, &self.direction, &other.origin, &other.direction)
    }

    /// Intersects two lines, returning the crossing point.
    #[must_use]
    pub fn crossing(&self, other: &Line) -> Option<Point2> {
        self.intersect_line(other).map(|(t, _)| self.point_at(t))
    }

    /// Returns the parameters where the line crosses `circle`, ascending.
    #[must_use]
    pub fn intersect_circle(&self, circle: &Circle) -> Vec<f64> {
        line_circle_intersect_2d(&self.origin, &self.direction, circle.center(), circle.radius())
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Point2 {
        self.point_at(t)
    }

    fn tangent(&self, _t: f64) -> Vector2 {
        self.direction
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
