use std::collections::HashSet;

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::{Transform, TOLERANCE};
use crate::topology::{EdgeId, Map, VertexId};

/// Which vertices a transform moves.
#[derive(Debug, Clone)]
enum Selection {
    All,
    Vertices(Vec<VertexId>),
}

/// Applies an arbitrary affine transform to a map or to part of it.
pub struct GeneralTransform {
    selection: Selection,
    transform: Transform,
}

impl GeneralTransform {
    /// Creates a `GeneralTransform` that moves the whole map.
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            selection: Selection::All,
            transform,
        }
    }

    /// Creates a `GeneralTransform` that moves only `vertices`.
    ///
    /// Arc centers are carried along only for edges with both endpoints in
    /// the selection; other arcs are re-solved from their moved endpoints.
    #[must_use]
    pub fn on_vertices(vertices: Vec<VertexId>, transform: Transform) -> Self {
        Self {
            selection: Selection::Vertices(vertices),
            transform,
        }
    }

    /// Executes the transformation, modifying the map in place.
    ///
    /// Moves the selected vertex positions, transforms the nominal centers
    /// of arcs lying wholly in the selection, then re-solves every touched
    /// edge and re-sorts the neighbour lists of every touched vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform collapses the plane, a selected
    /// vertex is missing, or an arc becomes degenerate.
    pub fn execute(&self, map: &mut Map) -> Result<()> {
        if self.transform.scale_factor() < TOLERANCE {
            return Err(GeometryError::Degenerate("transform collapses the plane".into()).into());
        }
        let selected: HashSet<VertexId> = match &self.selection {
            Selection::All => map.vertex_ids().into_iter().collect(),
            Selection::Vertices(ids) => ids.iter().copied().collect(),
        };

        for &v in &selected {
            let p = map.point(v)?;
            map.vertex_mut(v)?.point = self.transform.apply(&p);
        }

        let mut touched_edges: Vec<EdgeId> = Vec::new();
        let mut touched_vertices: HashSet<VertexId> = selected.clone();
        for (id, e) in map.edges() {
            let (in1, in2) = (selected.contains(&e.v1), selected.contains(&e.v2));
            if in1 || in2 {
                touched_edges.push(id);
                touched_vertices.insert(e.v1);
                touched_vertices.insert(e.v2);
            }
        }

        for &e in &touched_edges {
            let edge = map.edge_mut(e)?;
            let whole = selected.contains(&edge.v1) && selected.contains(&edge.v2);
            if whole {
                if let Some(spec) = edge.curve.arc_spec_mut() {
                    spec.center = self.transform.apply(&spec.center);
                }
            }
            map.refresh_edge(e)?;
        }
        for v in touched_vertices {
            map.rebuild_neighbours(v)?;
        }
        trace!(
            vertices = selected.len(),
            edges = touched_edges.len(),
            "transform applied"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::{Point2, Vector2};
    use crate::topology::{ArcSpec, EdgeCurve};

    #[test]
    fn whole_map_keeps_arc_shape() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(1.0, 0.0));
        let b = map.insert_vertex(Point2::new(0.0, 1.0));
        let e = map
            .insert_edge(a, b, EdgeCurve::Curve(ArcSpec::new(Point2::origin(), true)))
            .unwrap();
        let t = Transform::translation(&Vector2::new(3.0, 4.0));
        GeneralTransform::new(t).execute(&mut map).unwrap();

        let arc = map.edge(e).unwrap().arc.unwrap();
        assert_abs_diff_eq!(arc.center().x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.center().y, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.span(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn partial_selection_moves_only_selected() {
        let mut map = Map::new();
        let a = map.insert_vertex(Point2::new(0.0, 0.0));
        let b = map.insert_vertex(Point2::new(1.0, 0.0));
        let c = map.insert_vertex(Point2::new(0.0, 1.0));
        map.insert_line(a, b).unwrap();
        map.insert_line(a, c).unwrap();
        let t = Transform::translation(&Vector2::new(0.0, 2.0));
        GeneralTransform::on_vertices(vec![b], t).execute(&mut map).unwrap();

        assert_abs_diff_eq!(map.point(b).unwrap().y, 2.0);
        assert_abs_diff_eq!(map.point(c).unwrap().y, 1.0);
        // `b` now leaves `a` at a steeper angle than before, still below `c`.
        assert!(map.verify().is_ok());
    }

    #[test]
    fn collapsing_transform_is_rejected() {
        let mut map = Map::new();
        map.insert_vertex(Point2::new(1.0, 1.0));
        let t = Transform::scaling_about(&Point2::origin(), 0.0);
        assert!(GeneralTransform::new(t).execute(&mut map).is_err());
    }
}
