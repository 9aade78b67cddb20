use std::collections::HashMap;
use std::fmt;

use crate::topology::{EdgeId, Map, VertexId};

/// A violation of one of the map invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// An edge endpoint is not in the map.
    DanglingEndpoint { edge: EdgeId },
    /// A vertex's neighbour list and the edges touching it disagree.
    NeighbourMismatch { vertex: VertexId, edge: EdgeId },
    /// A neighbour list is not in ascending angle order.
    Unsorted { vertex: VertexId },
    /// Two edges leave a vertex in the same direction.
    CoincidentDirections {
        vertex: VertexId,
        first: EdgeId,
        second: EdgeId,
    },
    /// Two vertices lie within the merge tolerance.
    CoincidentVertices { first: VertexId, second: VertexId },
    /// Two edges connect the same pair of vertices.
    DuplicateEdge { first: EdgeId, second: EdgeId },
    /// An edge connects a vertex to itself.
    SelfLoop { edge: EdgeId },
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEndpoint { edge } => write!(f, "edge {edge:?} has a missing endpoint"),
            Self::NeighbourMismatch { vertex, edge } => {
                write!(f, "vertex {vertex:?} and edge {edge:?} disagree on incidence")
            }
            Self::Unsorted { vertex } => write!(f, "neighbours of {vertex:?} are not sorted"),
            Self::CoincidentDirections {
                vertex,
                first,
                second,
            } => write!(
                f,
                "edges {first:?} and {second:?} leave {vertex:?} in the same direction"
            ),
            Self::CoincidentVertices { first, second } => {
                write!(f, "vertices {first:?} and {second:?} coincide")
            }
            Self::DuplicateEdge { first, second } => {
                write!(f, "edges {first:?} and {second:?} connect the same vertices")
            }
            Self::SelfLoop { edge } => write!(f, "edge {edge:?} is a self-loop"),
        }
    }
}

/// Checks every map invariant and reports all defects found.
///
/// 1. every edge's endpoints exist;
/// 2. every neighbour list holds exactly the incident edges, sorted, with
///    no two sharing a direction;
/// 3. no two vertices lie within the map tolerance;
/// 4. no duplicate edges and no self-loops.
#[derive(Debug, Default)]
pub struct Verify {
    tolerance: Option<f64>,
}

impl Verify {
    /// Creates a new `Verify` query using the map's own tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the vertex coincidence tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: Some(tolerance),
        }
    }

    /// Executes the query. An empty result means the map is valid.
    #[must_use]
    pub fn execute(&self, map: &Map) -> Vec<Defect> {
        let tol = self.tolerance.unwrap_or_else(|| map.tolerance());
        let mut defects = Vec::new();
        check_edges(map, &mut defects);
        check_neighbours(map, &mut defects);
        check_coincident_vertices(map, tol, &mut defects);
        defects
    }
}

fn check_edges(map: &Map, defects: &mut Vec<Defect>) {
    let mut seen: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
    for (id, e) in map.edges() {
        if e.v1 == e.v2 {
            defects.push(Defect::SelfLoop { edge: id });
            continue;
        }
        if !map.contains_vertex(e.v1) || !map.contains_vertex(e.v2) {
            defects.push(Defect::DanglingEndpoint { edge: id });
            continue;
        }
        for v in [e.v1, e.v2] {
            let listed = map.vertex(v).is_ok_and(|vd| vd.neighbours.contains(id));
            if !listed {
                defects.push(Defect::NeighbourMismatch { vertex: v, edge: id });
            }
        }
        let key = if e.v1 < e.v2 { (e.v1, e.v2) } else { (e.v2, e.v1) };
        if let Some(&first) = seen.get(&key) {
            defects.push(Defect::DuplicateEdge { first, second: id });
        } else {
            seen.insert(key, id);
        }
    }
}

fn check_neighbours(map: &Map, defects: &mut Vec<Defect>) {
    for (vid, v) in map.vertices() {
        for edge in v.neighbours.edges() {
            let touches = map.edge(edge).is_ok_and(|e| e.touches(vid));
            if !touches {
                defects.push(Defect::NeighbourMismatch { vertex: vid, edge });
            }
        }
        if !v.neighbours.is_sorted() {
            defects.push(Defect::Unsorted { vertex: vid });
        }
        for (first, second) in v.neighbours.coincident_directions() {
            defects.push(Defect::CoincidentDirections {
                vertex: vid,
                first,
                second,
            });
        }
    }
}

fn check_coincident_vertices(map: &Map, tol: f64, defects: &mut Vec<Defect>) {
    // Sweep along x: only vertices within `tol` in x can coincide.
    let mut sorted: Vec<_> = map.vertices().map(|(id, v)| (id, v.point)).collect();
    sorted.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
    for (i, (a, pa)) in sorted.iter().enumerate() {
        for (b, pb) in sorted[i + 1..].iter() {
            if pb.x - pa.x > tol {
                break;
            }
            if (pa - pb).norm() <= tol {
                defects.push(Defect::CoincidentVertices {
                    first: *a,
                    second: *b,
                });
            }
        }
    }
}
