use std::collections::HashMap;

use tracing::trace;

use crate::error::Result;
use crate::topology::{derive_arc, EdgeId, Map, Neighbours, VertexId};

/// Merges one vertex into another.
///
/// Every edge of `remove` is re-pointed to `keep`. Edges that would become
/// self-loops or duplicate an existing edge of `keep` are discarded.
/// `keep` does not move. The map is left untouched when a re-pointed arc
/// would become degenerate.
pub struct MergeVertices {
    keep: VertexId,
    remove: VertexId,
}

impl MergeVertices {
    /// Creates a new `MergeVertices` operation.
    #[must_use]
    pub fn new(keep: VertexId, remove: VertexId) -> Self {
        Self { keep, remove }
    }

    /// Executes the merge, returning the number of edges discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or a re-pointed arc
    /// becomes degenerate.
    pub fn execute(&self, map: &mut Map) -> Result<usize> {
        let (keep, remove) = (self.keep, self.remove);
        if keep == remove {
            return Ok(0);
        }
        let target = map.vertex(keep)?.point;
        let incident: Vec<EdgeId> = map.vertex(remove)?.neighbours.edges().collect();

        // Every surviving arc must still solve from its new endpoint.
        for &e in &incident {
            let data = map.edge(e)?;
            let Some(other) = data.other(remove) else {
                continue;
            };
            if other == keep || map.find_edge(keep, other).is_some() {
                continue;
            }
            let far = map.vertex(other)?.point;
            let (p1, p2) = if data.v1 == remove { (target, far) } else { (far, target) };
            derive_arc(&p1, &p2, &data.curve)?;
        }
        map.vertex_mut(remove)?.neighbours = Neighbours::new();

        let mut dropped = 0;
        let mut touched = vec![keep];
        for e in incident {
            let Some(other) = map.edge(e).ok().and_then(|d| d.other(remove)) else {
                continue;
            };
            if other == keep || map.find_edge(keep, other).is_some() {
                map.remove_edge(e)?;
                trace!(?e, "edge discarded by merge");
                dropped += 1;
                continue;
            }
            let edge = map.edge_mut(e)?;
            if edge.v1 == remove {
                edge.v1 = keep;
            } else {
                edge.v2 = keep;
            }
            map.refresh_edge(e)?;
            let angle = map.departure_angle(e, keep)?;
            map.vertex_mut(keep)?.neighbours.insert(e, angle);
            touched.push(other);
        }

        map.remove_vertex(remove)?;
        for v in touched {
            map.rebuild_neighbours(v)?;
        }
        trace!(?keep, ?remove, dropped, "vertices merged");
        Ok(dropped)
    }
}

/// Merges every pair of vertices closer than a tolerance.
///
/// Candidate pairs are processed in increasing distance order. Before each
/// merge the pair is re-resolved to the vertices that currently survive and
/// their distance is checked again, so a chain of points each within the
/// tolerance of the next does not collapse into one.
pub struct MergeCoincident {
    tolerance: f64,
}

impl MergeCoincident {
    /// Creates a new `MergeCoincident` operation.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Executes the merge, returning the number of vertices removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a merge fails.
    pub fn execute(&self, map: &mut Map) -> Result<usize> {
        let tol = self.tolerance;
        let mut pairs = candidate_pairs(map, tol);
        pairs.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut survivor: HashMap<VertexId, VertexId> = HashMap::new();
        let mut merged = 0;
        for (a, b, _) in pairs {
            let (a, b) = (resolve(&survivor, a), resolve(&survivor, b));
            if a == b {
                continue;
            }
            let (pa, pb) = (map.point(a)?, map.point(b)?);
            if (pa - pb).norm() > tol {
                continue;
            }
            MergeVertices::new(a, b).execute(map)?;
            survivor.insert(b, a);
            merged += 1;
        }
        Ok(merged)
    }
}

fn resolve(survivor: &HashMap<VertexId, VertexId>, mut v: VertexId) -> VertexId {
    while let Some(&next) = survivor.get(&v) {
        v = next;
    }
    v
}

/// All vertex pairs within `tol`, with their distances.
fn candidate_pairs(map: &Map, tol: f64) -> Vec<(VertexId, VertexId, f64)> {
    let mut sorted: Vec<_> = map.vertices().map(|(id, v)| (id, v.point)).collect();
    sorted.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
    let mut pairs = Vec::new();
    for (i, (a, pa)) in sorted.iter().enumerate() {
        for (b, pb) in &sorted[i + 1..] {
            if pb.x - pa.x > tol {
                break;
            }
            let d = (pa - pb).norm();
            if d <= tol {
                pairs.push((*a, *b, d));
            }
        }
    }
    pairs
}
