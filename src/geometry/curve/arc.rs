use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::arc_2d::{
    angle_in_sweep, arc_point_at, arc_tangent_at, crossed_axis_angles, solve_arc,
};
use crate::math::{polar_point, Aabb, Point2, Vector2};

use super::{Curve, CurveDomain};

/// A circular arc between two edge endpoints.
///
/// Derived from the endpoints, a nominal center and a convexity flag (see
/// [`Arc::through`]). The parametric form runs from `t = 0` at the first
/// endpoint to `t = 1` at the second, sweeping `span` radians from
/// `start_angle`; positive spans are counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    span: f64,
    convex: bool,
}

impl Arc {
    /// Builds the arc from `p1` to `p2` about `nominal_center`.
    ///
    /// The radius is the mean of the nominal center's distances to both
    /// endpoints and the actual center is moved onto the chord's
    /// perpendicular bisector. Convex arcs take the minor arc, concave arcs
    /// the major one.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide or the nominal center is
    /// collinear with the chord.
    pub fn through(p1: &Point2, p2: &Point2, nominal_center: &Point2, convex: bool) -> Result<Self> {
        let solved = solve_arc(p1, p2, nominal_center, convex)?;
        Ok(Self {
            center: solved.center,
            radius: solved.radius,
            start_angle: solved.start_angle,
            span: solved.sweep,
            convex,
        })
    }

    /// Returns the solved center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Start angle in `[0, 2π)`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Signed angular span; positive is counter-clockwise.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    #[must_use]
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Returns the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, self.start_angle, self.span, t)
    }

    /// Returns the unit tangent at parameter `t`, pointing towards `t = 1`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        arc_tangent_at(self.start_angle, self.span, t)
    }

    /// Returns `true` if the polar angle `angle` (about the center) lies on the arc.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle_in_sweep(angle, self.start_angle, self.span)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.span.abs()
    }

    /// The bounding rectangle of the full circle the arc lies on.
    #[must_use]
    pub fn bounding_rect(&self) -> Aabb {
        let r = Vector2::new(self.radius, self.radius);
        Aabb {
            min: self.center - r,
            max: self.center + r,
        }
    }

    /// The tight bounding rectangle of the arc itself.
    ///
    /// Covers both endpoints plus every axis extreme the sweep passes.
    #[must_use]
    pub fn tight_bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_point(self.point_at(0.0));
        aabb.include(&self.point_at(1.0));
        for angle in crossed_axis_angles(self.start_angle, self.span) {
            aabb.include(&polar_point(&self.center, self.radius, angle));
        }
        aabb
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Point2 {
        self.point_at(t)
    }

    fn tangent(&self, t: f64) -> Vector2 {
        self.tangent_at(t)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
