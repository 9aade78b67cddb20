use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::curve::{Circle, Line};
use crate::math::intersect_2d::ray_polygon_intersect_2d;
use crate::math::polygon_2d::regular_polygon;
use crate::math::{Point2, Vector2, TOLERANCE};

/// The outline that extended rays run out to. Coordinates are relative to
/// the motif center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boundary {
    RegularPolygon {
        sides: usize,
        radius: f64,
        /// Polar angle of the first corner, in radians.
        rotation: f64,
    },
    Polygon {
        points: Vec<Point2>,
    },
    Circle {
        radius: f64,
    },
}

impl Boundary {
    /// The polygon corners placed about `center`, or `None` for a circle.
    ///
    /// # Errors
    ///
    /// Returns an error if a regular polygon's parameters are invalid.
    pub fn corners(&self, center: &Point2) -> Result<Option<Vec<Point2>>> {
        match self {
            Self::RegularPolygon {
                sides,
                radius,
                rotation,
            } => regular_polygon(*sides, *radius, *rotation, center).map(Some),
            Self::Polygon { points } => Ok(Some(
                points.iter().map(|p| center + p.coords).collect(),
            )),
            Self::Circle { .. } => Ok(None),
        }
    }

    /// Where the ray from `origin` along `dir` first leaves through the
    /// boundary placed about `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary or the direction is degenerate.
    pub fn hit(&self, center: &Point2, origin: &Point2, dir: &Vector2) -> Result<Option<Point2>> {
        if let Self::Circle { radius } = self {
            let circle = Circle::new(*center, *radius)?;
            let ray = Line::new(*origin, *dir)?;
            return Ok(ray
                .intersect_circle(&circle)
                .into_iter()
                .rfind(|&t| t > TOLERANCE)
                .map(|t| ray.point_at(t)));
        }
        let corners = self.corners(center)?.unwrap_or_default();
        Ok(ray_polygon_intersect_2d(origin, dir, &corners, TOLERANCE).map(|(p, _, _)| p))
    }
}

/// Final-stage post-processing for extended motifs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub boundary: Boundary,
    /// Extend degree-1 vertices along their only edge.
    pub extend_free: bool,
    /// Extend the outermost vertices along their radius.
    pub extend_peripheral: bool,
    /// Join the new boundary vertices in angular order.
    pub connect_boundary: bool,
}

impl Extension {
    /// Extends free and peripheral vertices without connecting them.
    #[must_use]
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            extend_free: true,
            extend_peripheral: true,
            connect_boundary: false,
        }
    }

    #[must_use]
    pub fn free(mut self, on: bool) -> Self {
        self.extend_free = on;
        self
    }

    #[must_use]
    pub fn peripheral(mut self, on: bool) -> Self {
        self.extend_peripheral = on;
        self
    }

    #[must_use]
    pub fn connected(mut self, on: bool) -> Self {
        self.connect_boundary = on;
        self
    }
}
