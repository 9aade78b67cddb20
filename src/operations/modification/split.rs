use std::f64::consts::PI;

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::{coincident, normalize_angle, polar_angle, Point2};
use crate::topology::{ArcSpec, EdgeCurve, EdgeData, EdgeId, Map, VertexId};

/// Where an edge is split.
#[derive(Debug, Clone, Copy)]
enum SplitAt {
    /// At a new vertex inserted at this point.
    Point(Point2),
    /// At an existing vertex.
    Vertex(VertexId),
}

/// Splits an edge in two at a point or an existing vertex.
///
/// The original edge is removed and replaced by one edge from each endpoint
/// to the split vertex. Arcs are split into two arcs about the same center.
pub struct SplitEdge {
    edge: EdgeId,
    at: SplitAt,
}

impl SplitEdge {
    /// Creates a `SplitEdge` that inserts a new vertex at `point`.
    #[must_use]
    pub fn new(edge: EdgeId, point: Point2) -> Self {
        Self {
            edge,
            at: SplitAt::Point(point),
        }
    }

    /// Creates a `SplitEdge` that routes the edge through `vertex`.
    #[must_use]
    pub fn at_vertex(edge: EdgeId, vertex: VertexId) -> Self {
        Self {
            edge,
            at: SplitAt::Vertex(vertex),
        }
    }

    /// Executes the split, returning the split vertex and the two new edges
    /// (from `v1` and to `v2` respectively).
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or the split point coincides
    /// with one of its endpoints.
    pub fn execute(&self, map: &mut Map) -> Result<(VertexId, EdgeId, EdgeId)> {
        let data = map.edge(self.edge)?.clone();
        let (p1, p2) = map.edge_points(self.edge)?;
        let point = match self.at {
            SplitAt::Point(p) => p,
            SplitAt::Vertex(v) => map.point(v)?,
        };
        let tol = map.tolerance();
        if coincident(&point, &p1, tol) || coincident(&point, &p2, tol) {
            return Err(
                GeometryError::Degenerate("split point coincides with an edge endpoint".into())
                    .into(),
            );
        }

        let (first, second) = split_curves(&data, &point);
        let mid = match self.at {
            SplitAt::Point(p) => map.insert_vertex(p),
            SplitAt::Vertex(v) => v,
        };
        map.remove_edge(self.edge)?;
        let e1 = map.insert_edge(data.v1, mid, first)?;
        let e2 = map.insert_edge(mid, data.v2, second)?;
        trace!(edge = ?self.edge, ?mid, "edge split");
        Ok((mid, e1, e2))
    }
}

/// The curves of the two halves of `data` split at `point`.
fn split_curves(data: &EdgeData, point: &Point2) -> (EdgeCurve, EdgeCurve) {
    let Some(arc) = &data.arc else {
        return (data.curve, data.curve);
    };
    let theta = polar_angle(&(point - arc.center()));
    let span = arc.span();
    let first = if span >= 0.0 {
        normalize_angle(theta - arc.start_angle())
    } else {
        -normalize_angle(arc.start_angle() - theta)
    };
    let second = span - first;
    let center = *arc.center();
    (
        EdgeCurve::Curve(ArcSpec::new(center, first.abs() <= PI)),
        EdgeCurve::Curve(ArcSpec::new(center, second.abs() <= PI)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn split_line_at_point() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(0.0, 0.0));
        let b = map.insert_vertex(Point2::new(2.0, 0.0));
        let e = map.insert_line(a, b).unwrap();
        let (mid, e1, e2) = SplitEdge::new(e, Point2::new(1.0, 0.0)).execute(&mut map).unwrap();
        assert_eq!(map.edge_count(), 2);
        assert_eq!(map.degree(mid).unwrap(), 2);
        assert!(map.edge(e1).unwrap().connects(a, mid));
        assert!(map.edge(e2).unwrap().connects(mid, b));
        assert!(!map.contains_edge(e));
        assert!(map.verify().is_ok());
    }

    #[test]
    fn split_at_endpoint_is_rejected() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(0.0, 0.0));
        let b = map.insert_vertex(Point2::new(2.0, 0.0));
        let e = map.insert_line(a, b).unwrap();
        assert!(SplitEdge::new(e, Point2::new(0.0, 0.0)).execute(&mut map).is_err());
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn split_major_arc_keeps_its_shape() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(1.0, 0.0));
        let b = map.insert_vertex(Point2::new(0.0, 1.0));
        let spec = ArcSpec::new(Point2::origin(), false);
        let e = map.insert_edge(a, b, EdgeCurve::Curve(spec)).unwrap();
        // The three-quarter arc passes through the point at 225°.
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let (_, e1, e2) = SplitEdge::new(e, Point2::new(-h, -h)).execute(&mut map).unwrap();
        let arc1 = map.edge(e1).unwrap().arc.unwrap();
        let arc2 = map.edge(e2).unwrap().arc.unwrap();
        assert_abs_diff_eq!(arc1.span().abs() + arc2.span().abs(), 1.5 * PI, epsilon = 1e-9);
        assert_abs_diff_eq!(arc1.radius(), 1.0, epsilon = 1e-9);
    }
}
