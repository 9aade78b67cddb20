pub mod edge;
pub mod neighbours;
pub mod vertex;

pub use edge::{ArcSpec, EdgeCurve, EdgeData, EdgeId};
pub use neighbours::{Neighbour, Neighbours};
pub use vertex::{VertexData, VertexId};

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{MapError, Result};
use crate::geometry::curve::{sample, Arc};
use crate::math::{coincident, polar_angle, Point2, MERGE_TOLERANCE, TOLERANCE};

/// A planar map: vertices, edges, and per-vertex angular edge order.
///
/// Entities reference each other via typed IDs (generational indices),
/// so removed edges leave stale handles rather than dangling pointers.
/// All mutation goes through the map, which keeps every vertex's
/// [`Neighbours`] sorted by departure angle.
#[derive(Debug, Clone)]
pub struct Map {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    tolerance: f64,
}

impl Default for Map {
    fn default() -> Self {
        Self::with_tolerance(MERGE_TOLERANCE)
    }
}

impl Map {
    /// Creates a new, empty map with the default merge tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty map with the given merge tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            tolerance,
        }
    }

    /// Distance below which two vertices count as the same point.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // --- Vertex access ---

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the map.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, MapError> {
        self.vertices
            .get(id)
            .ok_or(MapError::EntityNotFound("vertex"))
    }

    pub(crate) fn vertex_mut(
        &mut self,
        id: VertexId,
    ) -> std::result::Result<&mut VertexData, MapError> {
        self.vertices
            .get_mut(id)
            .ok_or(MapError::EntityNotFound("vertex"))
    }

    /// Returns the position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the map.
    pub fn point(&self, id: VertexId) -> std::result::Result<Point2, MapError> {
        self.vertex(id).map(|v| v.point)
    }

    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().collect()
    }

    /// Number of edges incident to `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the map.
    pub fn degree(&self, id: VertexId) -> std::result::Result<usize, MapError> {
        self.vertex(id).map(VertexData::degree)
    }

    /// Returns the vertex nearest to `p` within `tol`, if any.
    #[must_use]
    pub fn nearest_vertex(&self, p: &Point2, tol: f64) -> Option<VertexId> {
        self.vertices
            .iter()
            .map(|(id, v)| (id, (v.point - p).norm()))
            .filter(|(_, d)| *d <= tol)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // --- Edge access ---

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the map.
    pub fn edge(&self, id: EdgeId) -> std::result::Result<&EdgeData, MapError> {
        self.edges.get(id).ok_or(MapError::EntityNotFound("edge"))
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> std::result::Result<&mut EdgeData, MapError> {
        self.edges
            .get_mut(id)
            .ok_or(MapError::EntityNotFound("edge"))
    }

    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    /// Finds the edge connecting `a` and `b`, in either direction.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let va = self.vertices.get(a)?;
        va.neighbours
            .edges()
            .find(|&e| self.edges.get(e).is_some_and(|d| d.connects(a, b)))
    }

    /// Returns the endpoints of an edge as points.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its endpoints is missing.
    pub fn edge_points(&self, id: EdgeId) -> std::result::Result<(Point2, Point2), MapError> {
        let e = self.edge(id)?;
        Ok((self.point(e.v1)?, self.point(e.v2)?))
    }

    /// Returns points along an edge from `v1` to `v2`: the endpoints for
    /// straight kinds, `segments + 1` samples for an arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its endpoints is missing.
    pub fn edge_polyline(
        &self,
        id: EdgeId,
        segments: usize,
    ) -> std::result::Result<Vec<Point2>, MapError> {
        let (p1, p2) = self.edge_points(id)?;
        Ok(match &self.edge(id)?.arc {
            Some(arc) => sample(arc, segments),
            None => vec![p1, p2],
        })
    }

    // --- Mutation ---

    /// Inserts an isolated vertex and returns its ID.
    pub fn insert_vertex(&mut self, point: Point2) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Inserts an edge between two vertices.
    ///
    /// The edge is placed into both endpoints' neighbour lists at its
    /// angular position. If the two vertices are already connected the
    /// existing edge is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing, if `v1 == v2`, or if
    /// a curved edge's arc cannot be solved.
    pub fn insert_edge(&mut self, v1: VertexId, v2: VertexId, curve: EdgeCurve) -> Result<EdgeId> {
        if v1 == v2 {
            return Err(MapError::SelfLoop.into());
        }
        let p1 = self.point(v1)?;
        let p2 = self.point(v2)?;
        if let Some(existing) = self.find_edge(v1, v2) {
            trace!(?v1, ?v2, "edge already present");
            return Ok(existing);
        }

        let arc = derive_arc(&p1, &p2, &curve)?;
        let id = self.edges.insert(EdgeData { v1, v2, curve, arc });
        let (a1, a2) = {
            let data = &self.edges[id];
            (departure(data, v1, &p1, &p2), departure(data, v2, &p1, &p2))
        };
        self.vertex_mut(v1)?.neighbours.insert(id, a1);
        self.vertex_mut(v2)?.neighbours.insert(id, a2);
        trace!(?id, kind = curve.kind(), "edge inserted");
        Ok(id)
    }

    /// Inserts a straight edge between two vertices.
    ///
    /// # Errors
    ///
    /// See [`Map::insert_edge`].
    pub fn insert_line(&mut self, v1: VertexId, v2: VertexId) -> Result<EdgeId> {
        self.insert_edge(v1, v2, EdgeCurve::Line)
    }

    /// Removes an edge and its neighbour entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the map.
    pub fn remove_edge(&mut self, id: EdgeId) -> std::result::Result<EdgeData, MapError> {
        let data = self
            .edges
            .remove(id)
            .ok_or(MapError::EntityNotFound("edge"))?;
        for v in [data.v1, data.v2] {
            if let Some(vd) = self.vertices.get_mut(v) {
                vd.neighbours.remove(id);
            }
        }
        Ok(data)
    }

    /// Removes a vertex together with its incident edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the map.
    pub fn remove_vertex(&mut self, id: VertexId) -> std::result::Result<VertexData, MapError> {
        let incident: Vec<EdgeId> = self.vertex(id)?.neighbours.edges().collect();
        for e in incident {
            if self.edges.contains_key(e) {
                self.remove_edge(e)?;
            }
        }
        self.vertices
            .remove(id)
            .ok_or(MapError::EntityNotFound("vertex"))
    }

    /// Moves a vertex, re-solving incident arcs and angular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or an incident arc becomes
    /// degenerate.
    pub fn move_vertex(&mut self, id: VertexId, point: Point2) -> Result<()> {
        self.vertex_mut(id)?.point = point;
        let incident: Vec<EdgeId> = self.vertex(id)?.neighbours.edges().collect();
        let mut touched = vec![id];
        for e in incident {
            self.refresh_edge(e)?;
            if let Some(other) = self.edge(e)?.other(id) {
                touched.push(other);
            }
        }
        for v in touched {
            self.rebuild_neighbours(v)?;
        }
        Ok(())
    }

    /// Re-solves the derived arc of an edge from its current endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or its arc is degenerate.
    pub fn refresh_edge(&mut self, id: EdgeId) -> Result<()> {
        let (p1, p2) = self.edge_points(id)?;
        let edge = self.edge_mut(id)?;
        edge.arc = derive_arc(&p1, &p2, &edge.curve)?;
        Ok(())
    }

    /// The angle at which edge `id` leaves vertex `from`.
    ///
    /// Straight edges leave along their chord, arcs along their tangent.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its endpoints are missing.
    pub fn departure_angle(&self, id: EdgeId, from: VertexId) -> std::result::Result<f64, MapError> {
        let data = self.edge(id)?;
        let (p1, p2) = self.edge_points(id)?;
        Ok(departure(data, from, &p1, &p2))
    }

    /// Recomputes the angles of a vertex's neighbour list and re-sorts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing.
    pub fn rebuild_neighbours(&mut self, id: VertexId) -> std::result::Result<(), MapError> {
        let angles: HashMap<EdgeId, f64> = self
            .vertex(id)?
            .neighbours
            .edges()
            .filter_map(|e| self.departure_angle(e, id).ok().map(|a| (e, a)))
            .collect();
        self.vertex_mut(id)?
            .neighbours
            .rebuild(|e| angles.get(&e).copied().unwrap_or(0.0));
        Ok(())
    }

    /// Rebuilds every neighbour list from the edge arena.
    ///
    /// Stale entries are dropped, missing ones added, and every angle is
    /// recomputed. Returns the number of entries dropped or added.
    pub(crate) fn rebuild_incidence(&mut self) -> usize {
        let points: HashMap<VertexId, Point2> =
            self.vertices.iter().map(|(id, v)| (id, v.point)).collect();
        let mut incident: HashMap<VertexId, Vec<EdgeId>> = HashMap::new();
        for (id, e) in &self.edges {
            for v in [e.v1, e.v2] {
                if points.contains_key(&v) {
                    incident.entry(v).or_default().push(id);
                }
            }
        }

        let mut changed = 0;
        for (vid, vertex) in &mut self.vertices {
            let truth = incident.remove(&vid).unwrap_or_default();
            let mut fresh = Neighbours::new();
            for &e in &truth {
                let data = &self.edges[e];
                let (Some(p1), Some(p2)) = (points.get(&data.v1), points.get(&data.v2)) else {
                    continue;
                };
                fresh.insert(e, departure(data, vid, p1, p2));
            }
            changed += vertex
                .neighbours
                .edges()
                .filter(|e| !truth.contains(e))
                .count();
            changed += truth
                .iter()
                .filter(|&&e| !vertex.neighbours.contains(e))
                .count();
            vertex.neighbours = fresh;
        }
        changed
    }

    /// Copies every vertex and edge of `other` into this map without merging.
    ///
    /// Returns the mapping from `other`'s vertex ids to the new ones.
    pub fn append(&mut self, other: &Map) -> HashMap<VertexId, VertexId> {
        let vmap: HashMap<VertexId, VertexId> = other
            .vertices
            .iter()
            .map(|(id, v)| (id, self.vertices.insert(VertexData::new(v.point))))
            .collect();
        let mut emap: HashMap<EdgeId, EdgeId> = HashMap::with_capacity(other.edges.len());
        for (id, e) in &other.edges {
            let (Some(&v1), Some(&v2)) = (vmap.get(&e.v1), vmap.get(&e.v2)) else {
                continue;
            };
            let new_id = self.edges.insert(EdgeData {
                v1,
                v2,
                curve: e.curve,
                arc: e.arc,
            });
            emap.insert(id, new_id);
        }
        for (old, new) in &vmap {
            let entries: Vec<(EdgeId, f64)> = other.vertices[*old]
                .neighbours
                .iter()
                .filter_map(|n| emap.get(&n.edge).map(|&e| (e, n.angle)))
                .collect();
            let target = &mut self.vertices[*new].neighbours;
            for (e, angle) in entries {
                target.insert(e, angle);
            }
        }
        vmap
    }

    // --- Walks ---

    /// Traces the face to the right of the directed edge leaving `from`.
    ///
    /// Each step is an edge and the vertex it is walked from; the walk ends
    /// when it returns to the starting step.
    ///
    /// # Errors
    ///
    /// Returns an error if the start is not an edge leaving `from`, or the
    /// walk does not close (inconsistent neighbour lists).
    pub fn edges_around(
        &self,
        start: EdgeId,
        from: VertexId,
    ) -> std::result::Result<Vec<(EdgeId, VertexId)>, MapError> {
        let limit = 2 * self.edges.len() + 1;
        let mut steps = Vec::new();
        let (mut edge, mut at) = (start, from);
        loop {
            steps.push((edge, at));
            let next_vertex = self
                .edge(edge)?
                .other(at)
                .ok_or(MapError::EntityNotFound("edge endpoint"))?;
            let next_edge = self
                .vertex(next_vertex)?
                .neighbours
                .after(edge)
                .ok_or(MapError::EntityNotFound("neighbour entry"))?;
            (edge, at) = (next_edge, next_vertex);
            if (edge, at) == (start, from) {
                return Ok(steps);
            }
            if steps.len() > limit {
                return Err(MapError::Invalid {
                    count: 1,
                    first: "face walk does not close".into(),
                });
            }
        }
    }

    /// Walks a thread of edges starting along `edge` from `from`.
    ///
    /// At every vertex the walk continues along the first edge after the
    /// incoming one (counter-clockwise) that has not been walked yet, and
    /// stops when no such edge remains.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not leave `from`.
    pub fn walk_unvisited(
        &self,
        from: VertexId,
        edge: EdgeId,
    ) -> std::result::Result<Vec<EdgeId>, MapError> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let (mut at, mut current) = (from, edge);
        loop {
            visited.insert(current);
            path.push(current);
            let next_vertex = self
                .edge(current)?
                .other(at)
                .ok_or(MapError::EntityNotFound("edge endpoint"))?;
            match self
                .vertex(next_vertex)?
                .neighbours
                .first_unvisited(current, &visited)
            {
                Some(next) => (at, current) = (next_vertex, next),
                None => return Ok(path),
            }
        }
    }

    /// Checks the map invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Invalid`] with the defect count and the first
    /// defect found.
    pub fn verify(&self) -> std::result::Result<(), MapError> {
        let defects = crate::operations::query::Verify::new().execute(self);
        match defects.first() {
            None => Ok(()),
            Some(first) => Err(MapError::Invalid {
                count: defects.len(),
                first: first.to_string(),
            }),
        }
    }
}

/// Solves the arc of a curved edge; other kinds carry none.
pub(crate) fn derive_arc(p1: &Point2, p2: &Point2, curve: &EdgeCurve) -> Result<Option<Arc>> {
    match curve {
        EdgeCurve::Curve(spec) => Ok(Some(Arc::through(p1, p2, &spec.center, spec.convex)?)),
        EdgeCurve::Point | EdgeCurve::Line | EdgeCurve::Chord(_) => Ok(None),
    }
}

fn departure(data: &EdgeData, from: VertexId, p1: &Point2, p2: &Point2) -> f64 {
    let at_start = data.v1 == from;
    if let Some(arc) = &data.arc {
        let t = if at_start {
            arc.tangent_at(0.0)
        } else {
            -arc.tangent_at(1.0)
        };
        return polar_angle(&t);
    }
    let (here, there) = if at_start { (p1, p2) } else { (p2, p1) };
    if coincident(here, there, TOLERANCE) {
        return 0.0;
    }
    polar_angle(&(there - here))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// A plus sign: center vertex with four arms, inserted out of order.
    fn plus() -> (Map, VertexId, Vec<VertexId>) {
        let mut map = Map::new();
        let c = map.insert_vertex(p(0.0, 0.0));
        let arms: Vec<VertexId> = [p(0.0, -1.0), p(1.0, 0.0), p(-1.0, 0.0), p(0.0, 1.0)]
            .into_iter()
            .map(|q| map.insert_vertex(q))
            .collect();
        for &a in &arms {
            map.insert_line(c, a).unwrap();
        }
        (map, c, arms)
    }

    #[test]
    fn insertion_sorts_neighbours_by_angle() {
        let (map, c, arms) = plus();
        let order: Vec<VertexId> = map
            .vertex(c)
            .unwrap()
            .neighbours
            .edges()
            .map(|e| map.edge(e).unwrap().other(c).unwrap())
            .collect();
        // East, north, west, south.
        assert_eq!(order, vec![arms[1], arms[3], arms[2], arms[0]]);
        assert!(map.verify().is_ok());
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut map = Map::new();
        let a = map.insert_vertex(p(0.0, 0.0));
        assert!(map.insert_line(a, a).is_err());
    }

    #[test]
    fn duplicate_insertion_returns_existing_edge() {
        let mut map = Map::new();
        let a = map.insert_vertex(p(0.0, 0.0));
        let b = map.insert_vertex(p(1.0, 0.0));
        let e1 = map.insert_line(a, b).unwrap();
        let e2 = map.insert_line(b, a).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn curved_edges_leave_along_their_tangent() {
        let mut map = Map::new();
        let a = map.insert_vertex(p(1.0, 0.0));
        let b = map.insert_vertex(p(0.0, 1.0));
        let spec = ArcSpec::new(Point2::origin(), true);
        let e = map.insert_edge(a, b, EdgeCurve::Curve(spec)).unwrap();
        assert!(map.edge(e).unwrap().arc.is_some());
        assert_abs_diff_eq!(map.departure_angle(e, a).unwrap(), FRAC_PI_2, epsilon = 1e-9);
        assert_abs_diff_eq!(map.departure_angle(e, b).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn remove_vertex_drops_incident_edges() {
        let (mut map, c, arms) = plus();
        map.remove_vertex(c).unwrap();
        assert_eq!(map.edge_count(), 0);
        for a in arms {
            assert_eq!(map.degree(a).unwrap(), 0);
        }
        assert!(map.remove_vertex(c).is_err());
    }

    #[test]
    fn moving_a_vertex_reorders_neighbours() {
        let (mut map, c, arms) = plus();
        // Swing the east arm round to the south-west.
        map.move_vertex(arms[1], p(-1.0, -1.0)).unwrap();
        let first = map.vertex(c).unwrap().neighbours.edges().next().unwrap();
        assert_eq!(map.edge(first).unwrap().other(c), Some(arms[3]));
        assert!(map.verify().is_ok());
    }

    #[test]
    fn append_copies_without_merging() {
        let (unit, _, _) = plus();
        let mut map = Map::new();
        map.append(&unit);
        let vmap = map.append(&unit);
        assert_eq!(vmap.len(), 5);
        assert_eq!(map.vertex_count(), 10);
        assert_eq!(map.edge_count(), 8);
        // Coincident copies are a defect until merged.
        assert!(map.verify().is_err());
    }

    #[test]
    fn face_walk_around_a_square() {
        let mut map = Map::new();
        let v: Vec<VertexId> = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
            .into_iter()
            .map(|q| map.insert_vertex(q))
            .collect();
        let mut edges = Vec::new();
        for i in 0..4 {
            edges.push(map.insert_line(v[i], v[(i + 1) % 4]).unwrap());
        }
        // Walking a→b with the interior on the left: the right face is the
        // outside, which still has four sides.
        let steps = map.edges_around(edges[0], v[0]).unwrap();
        assert_eq!(steps.len(), 4);
        // Walking b→a puts the interior on the right.
        let steps = map.edges_around(edges[0], v[1]).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[1].1, v[0]);
    }

    #[test]
    fn thread_walk_visits_each_edge_once() {
        let (map, c, arms) = plus();
        let start = map.find_edge(arms[2], c).unwrap();
        let path = map.walk_unvisited(arms[2], start).unwrap();
        // West arm in, then the first unwalked arm counter-clockwise (south),
        // which dead-ends.
        assert_eq!(path.len(), 2);
        assert_eq!(map.edge(path[1]).unwrap().other(c), Some(arms[0]));
    }

    #[test]
    fn nearest_vertex_respects_tolerance() {
        let (map, c, _) = plus();
        assert_eq!(map.nearest_vertex(&p(1e-9, 0.0), 1e-6), Some(c));
        assert_eq!(map.nearest_vertex(&p(0.5, 0.5), 0.1), None);
    }

    #[test]
    fn arc_edges_are_sampled_end_to_end() {
        let mut map = Map::new();
        let a = map.insert_vertex(p(1.0, 0.0));
        let b = map.insert_vertex(p(0.0, 1.0));
        let e = map
            .insert_edge(a, b, EdgeCurve::Curve(ArcSpec::new(p(0.0, 0.0), true)))
            .unwrap();
        let points = map.edge_polyline(e, 8).unwrap();
        assert_eq!(points.len(), 9);
        assert_abs_diff_eq!(points[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[8].y, 1.0, epsilon = 1e-12);
        assert!(points.iter().all(|q| (q.coords.norm() - 1.0).abs() < 1e-12));

        let c = map.insert_vertex(p(2.0, 2.0));
        let line = map.insert_line(b, c).unwrap();
        assert_eq!(map.edge_polyline(line, 8).unwrap().len(), 2);
    }
}
