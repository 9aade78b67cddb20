use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{polar_angle, polar_point, Aabb, Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// A full circle, parameterized by polar angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the polar angle of `p` seen from the center.
    #[must_use]
    pub fn angle_of(&self, p: &Point2) -> f64 {
        polar_angle(&(p - self.center))
    }

    /// Returns `true` if `p` lies inside the circle or within `tol` of it.
    #[must_use]
    pub fn contains(&self, p: &Point2, tol: f64) -> bool {
        (p - self.center).norm() <= self.radius + tol
    }

    #[must_use]
    pub fn bounding_rect(&self) -> Aabb {
        let r = Vector2::new(self.radius, self.radius);
        Aabb {
            min: self.center - r,
            max: self.center + r,
        }
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Point2 {
        polar_point(&self.center, self.radius, t)
    }

    fn tangent(&self, t: f64) -> Vector2 {
        Vector2::new(-t.sin(), t.cos())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }
}
