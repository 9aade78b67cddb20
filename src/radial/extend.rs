use std::collections::HashSet;
use std::f64::consts::PI;

use tracing::debug;

use crate::error::Result;
use crate::math::{angle_distance, polar_angle, Point2, Vector2, ANGLE_TOLERANCE, TOLERANCE};
use crate::motif::{Boundary, Extension};
use crate::topology::{ArcSpec, EdgeCurve, Map, VertexId};

/// Runs free and peripheral vertices out to an extension boundary.
///
/// A free vertex (degree 1) continues in the direction of its only edge; a
/// peripheral vertex (farthest from the center) continues along its
/// radius. Hits within tolerance of an existing vertex reuse it.
pub struct Extend<'a> {
    extension: &'a Extension,
    center: Point2,
    tolerance: f64,
}

impl<'a> Extend<'a> {
    /// Creates a new `Extend` operation.
    #[must_use]
    pub fn new(extension: &'a Extension, center: Point2, tolerance: f64) -> Self {
        Self {
            extension,
            center,
            tolerance,
        }
    }

    /// Executes the extension, returning the number of rays added.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is degenerate or an edge cannot be
    /// inserted.
    pub fn execute(&self, map: &mut Map) -> Result<usize> {
        let rays = self.rays(map)?;
        let mut ends: Vec<VertexId> = Vec::new();
        for (v, dir) in rays {
            let origin = map.point(v)?;
            let Some(hit) = self.extension.boundary.hit(&self.center, &origin, &dir)? else {
                continue;
            };
            let end = match map.nearest_vertex(&hit, self.tolerance) {
                Some(w) => w,
                None => map.insert_vertex(hit),
            };
            if end == v || map.find_edge(v, end).is_some() {
                continue;
            }
            map.insert_line(v, end)?;
            ends.push(end);
        }
        let extended = ends.len();

        if self.extension.connect_boundary && extended >= 2 {
            self.connect_ring(map, ends)?;
        }
        debug!(extended, "motif extended");
        Ok(extended)
    }

    fn rays(&self, map: &Map) -> Result<Vec<(VertexId, Vector2)>> {
        let mut rays = Vec::new();
        let mut seen = HashSet::new();
        if self.extension.extend_free {
            for (id, v) in map.vertices().filter(|(_, v)| v.degree() == 1) {
                let Some(e) = v.neighbours.edges().next() else {
                    continue;
                };
                let Some(other) = map.edge(e)?.other(id) else {
                    continue;
                };
                let dir = v.point - map.point(other)?;
                if dir.norm() > TOLERANCE && seen.insert(id) {
                    rays.push((id, dir));
                }
            }
        }
        if self.extension.extend_peripheral {
            let reach = map
                .vertices()
                .map(|(_, v)| (v.point - self.center).norm())
                .fold(0.0, f64::max);
            for (id, v) in map.vertices() {
                let dir = v.point - self.center;
                let r = dir.norm();
                if r > TOLERANCE && r >= reach - self.tolerance && seen.insert(id) {
                    rays.push((id, dir));
                }
            }
        }
        Ok(rays)
    }

    /// Joins the boundary vertices (and polygon corners) in angular order.
    fn connect_ring(&self, map: &mut Map, mut ring: Vec<VertexId>) -> Result<()> {
        let boundary = &self.extension.boundary;
        if let Some(corners) = boundary.corners(&self.center)? {
            for p in corners {
                let v = match map.nearest_vertex(&p, self.tolerance) {
                    Some(v) => v,
                    None => map.insert_vertex(p),
                };
                ring.push(v);
            }
        }
        let mut keyed: Vec<(f64, VertexId)> = ring
            .into_iter()
            .map(|v| Ok((polar_angle(&(map.point(v)? - self.center)), v)))
            .collect::<Result<_>>()?;
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.dedup_by(|a, b| a.1 == b.1);

        let n = keyed.len();
        for i in 0..n {
            let (a0, a) = keyed[i];
            let (b0, b) = keyed[(i + 1) % n];
            if a == b || map.find_edge(a, b).is_some() {
                continue;
            }
            let curve = match boundary {
                Boundary::Circle { .. } if angle_distance(a0, b0) < PI - ANGLE_TOLERANCE => {
                    EdgeCurve::Curve(ArcSpec::new(self.center, true))
                }
                _ => EdgeCurve::Line,
            };
            map.insert_edge(a, b, curve)?;
        }
        Ok(())
    }
}
